/// Plan Lines — show what would be sent to the synthesis engine for a line set.
///
/// Usage: plan_lines <lines.ron> [--voices <path>] [--settings <path>]
///                   [--speakers <a,b,..>] [--json]

use dialogue_voice::core::pipeline::{LinePlan, LinePlanner};
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
        print_usage();
        process::exit(0);
    }

    let lines_path = &args[1];
    let mut voices_path = None;
    let mut settings_path = None;
    let mut speakers: Vec<String> = Vec::new();
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--voices" if i + 1 < args.len() => {
                i += 1;
                voices_path = Some(args[i].clone());
            }
            "--settings" if i + 1 < args.len() => {
                i += 1;
                settings_path = Some(args[i].clone());
            }
            "--speakers" if i + 1 < args.len() => {
                i += 1;
                speakers = args[i]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "--json" => json = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let lines = match LineSet::load_from_ron(Path::new(lines_path)) {
        Ok(lines) => lines.filter_speakers(&speakers),
        Err(e) => {
            eprintln!("ERROR: Failed to load lines: {}", e);
            process::exit(1);
        }
    };

    let mut builder = LinePlanner::builder();
    if let Some(ref path) = voices_path {
        builder = builder.voices_file(path);
    }
    if let Some(ref path) = settings_path {
        builder = builder.settings_file(path);
    }
    let planner = match builder.build() {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let (plans, summary) = planner.plan_all(lines.iter());

    if json {
        match serde_json::to_string_pretty(&plans) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("ERROR: Failed to serialize plans: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for plan in &plans {
        match plan {
            LinePlan::Synthesize(p) => {
                let emotion = p
                    .emotion
                    .as_ref()
                    .map(|e| format!(" [{} via {:?}]", e.label, e.source))
                    .unwrap_or_default();
                let vocal = p
                    .vocalization
                    .as_ref()
                    .filter(|v| v.is_pure)
                    .map(|v| format!(" <{}>", v.category))
                    .unwrap_or_default();
                println!("{:>8}  {:<12} {:<20} {}{}{}", p.id, p.speaker, p.voice, p.text, vocal, emotion);
            }
            LinePlan::Skip { id, reason } => {
                println!("{:>8}  skipped: {:?}", id, reason);
            }
        }
    }

    println!(
        "\nSummary: {} planned ({} vocalizations, {} with emotion), {} skipped",
        summary.planned,
        summary.vocalizations,
        summary.with_emotion,
        summary.skipped()
    );
}

fn print_usage() {
    println!("Usage: plan_lines <lines.ron> [--voices <path>] [--settings <path>] [--speakers <a,b,..>] [--json]");
    println!();
    println!("  --voices    voice table (.json legacy map or .ron)");
    println!("  --settings  run settings (.ron)");
    println!("  --speakers  only plan lines from these speakers");
    println!("  --json      print plans as JSON");
}
