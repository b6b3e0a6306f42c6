/// Line Audit — corpus report for a line set: lines per speaker, detected
/// emotions and vocalizations.
///
/// Usage: line_audit <lines.ron> [--min <confidence>] [--list]

use dialogue_voice::core::audit::{emotion_distribution, speaker_counts, vocalization_report};
use dialogue_voice::schema::line::LineSet;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: line_audit <lines.ron> [--min <confidence>] [--list]");
        process::exit(0);
    }

    let lines_path = &args[1];
    let mut min_confidence = 0.6;
    let mut list = false;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--min" && i + 1 < args.len() {
            i += 1;
            min_confidence = args[i].parse().unwrap_or(min_confidence);
        } else if args[i] == "--list" {
            list = true;
        }
        i += 1;
    }

    let lines = match LineSet::load_from_ron(Path::new(lines_path)) {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("ERROR: Failed to load lines: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded {} lines", lines.len());

    println!("\n=== Speakers ===\n");
    let mut speakers: Vec<_> = speaker_counts(lines.iter()).into_iter().collect();
    speakers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (speaker, count) in &speakers {
        println!("  {:<20} {}", speaker, count);
    }

    println!("\n=== Detected emotions ===\n");
    let mut emotions: Vec<_> = emotion_distribution(lines.iter()).into_iter().collect();
    emotions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.key().cmp(&b.0.key())));
    for (label, count) in &emotions {
        println!("  {:<20} {}", label, count);
    }

    println!("\n=== Vocalizations (>= {:.2}) ===\n", min_confidence);
    let report = vocalization_report(lines.iter(), min_confidence);
    for (category, count) in report.ranked_categories() {
        println!("  {:<20} {}", category, count);
    }
    if list {
        println!();
        for entry in &report.entries {
            println!(
                "  {:>8}  {:<12} {:<8} {:.2}{}  {}",
                entry.id,
                entry.speaker,
                entry.result.category,
                entry.result.confidence,
                if entry.result.is_pure { " pure" } else { "     " },
                entry.text
            );
        }
    }

    println!(
        "\nSummary: {} speakers, {} vocalizations ({} pure)",
        speakers.len(),
        report.entries.len(),
        report.pure
    );
}
