/// Classify Text — run the sanitizer, vocalization classifier and emotion
/// detector over text given on the command line or stdin.
///
/// Usage: classify_text [--min <confidence>] [text...]

use dialogue_voice::core::classify::{classify, DEFAULT_MIN_CONFIDENCE};
use dialogue_voice::core::emotion::detect_emotion;
use dialogue_voice::core::sanitize::sanitize;
use dialogue_voice::core::transform::transform;
use std::io::{self, BufRead};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut min_confidence = DEFAULT_MIN_CONFIDENCE;
    let mut words = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: classify_text [--min <confidence>] [text...]");
                println!("Reads one line per input from stdin when no text is given.");
                process::exit(0);
            }
            "--min" if i + 1 < args.len() => {
                i += 1;
                min_confidence = match args[i].parse() {
                    Ok(value) => value,
                    Err(_) => {
                        eprintln!("ERROR: --min expects a number, got '{}'", args[i]);
                        process::exit(1);
                    }
                };
            }
            _ => words.push(args[i].clone()),
        }
        i += 1;
    }

    if !words.is_empty() {
        report(&words.join(" "), min_confidence);
        return;
    }

    for line in io::stdin().lock().lines().map_while(Result::ok) {
        if !line.trim().is_empty() {
            report(&line, min_confidence);
        }
    }
}

fn report(raw: &str, min_confidence: f32) {
    let text = sanitize(raw);
    println!("input:     {}", raw);
    println!("sanitized: {}", text);

    match classify(&text, min_confidence) {
        Some(result) => {
            println!(
                "vocal:     {} ({:.2}, {}) matched {:?}{}",
                result.category,
                result.confidence,
                result.description,
                result.matched,
                if result.is_pure { ", pure" } else { "" }
            );
            if result.is_pure {
                println!("respelled: {}", transform(&text, result.category));
            }
        }
        None => println!("vocal:     none"),
    }

    println!("emotion:   {}", detect_emotion(&text));
    println!();
}
