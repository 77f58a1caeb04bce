/// Preview: interactive shell for watching messages turn into stickers.
///
/// Usage: preview [--lexicon <path>] [--pool <path>] [--tuning <path>] [--seed <n>]
///
/// Commands:
///   <text>            run the full pipeline on a message
///   probs <text>      show scores and probabilities only
///   seed <n>          reset the RNG to seed n
///   bulk <n> <text>   dispatch n times and report rates
///   help              list commands
///   quit              exit

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use sticker_engine::core::pipeline::{DispatchTrace, StickerEngine};
use sticker_engine::core::uniform::seeded;
use sticker_engine::schema::emotion::{EmotionLabel, LabelMap};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return;
    }

    let mut builder = StickerEngine::builder();
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lexicon" if i + 1 < args.len() => {
                i += 1;
                builder = builder.lexicon_path(&args[i]);
            }
            "--pool" if i + 1 < args.len() => {
                i += 1;
                builder = builder.pool_path(&args[i]);
            }
            "--tuning" if i + 1 < args.len() => {
                i += 1;
                builder = builder.tuning_path(&args[i]);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Loaded {} sticker keys", engine.pool().total_assets());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut rng = seeded(seed);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "seed" => match rest.parse::<u64>() {
                Ok(n) => {
                    rng = seeded(n);
                    println!("Seed set to {}", n);
                }
                Err(_) => println!("Usage: seed <n>"),
            },
            "probs" => {
                if rest.is_empty() {
                    println!("Usage: probs <text>");
                    continue;
                }
                print_probabilities(&engine, rest);
            }
            "bulk" => {
                let (count, text) = match rest.split_once(char::is_whitespace) {
                    Some((count, text)) => (count, text.trim()),
                    None => (rest, ""),
                };
                let count: usize = match count.parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Usage: bulk <n> <text>");
                        continue;
                    }
                };
                run_bulk(&engine, text, count, &mut rng);
            }
            _ => {
                let trace = engine.trace(line, &mut rng);
                print_trace(&trace);
            }
        }
    }
}

fn print_usage() {
    println!("Usage: preview [--lexicon <path>] [--pool <path>] [--tuning <path>] [--seed <n>]");
    println!();
    println!("  --lexicon <path>   RON cue lexicon layered over the built-in cues");
    println!("  --pool <path>      RON sticker pool file or directory");
    println!("  --tuning <path>    RON tuning overrides");
    println!("  --seed <n>         RNG seed (default 42)");
}

fn print_help() {
    println!("Commands:");
    println!("  <text>              Run the full pipeline on a message");
    println!("  probs <text>        Show scores and probabilities only");
    println!("  seed <n>            Reset the RNG to seed n");
    println!("  bulk <n> <text>     Dispatch n times and report rates");
    println!("  help                Show this help");
    println!("  quit                Exit");
}

fn print_probabilities(engine: &StickerEngine, text: &str) {
    let scores = engine.scores(text);
    let probs = engine.probabilities(text);
    println!("  {:<8} {:>8} {:>8}", "label", "score", "p");
    for label in EmotionLabel::ALL {
        let marker = if label == probs.most_likely() { "*" } else { " " };
        println!(
            "{} {:<8} {:>8.3} {:>8.3}",
            marker,
            label,
            scores[label],
            probs.mass(label)
        );
    }
}

fn print_trace(trace: &DispatchTrace<'_>) {
    println!(
        "  label: {} (p = {:.3})",
        trace.label, trace.intensity
    );
    println!(
        "  gate:  chance {:.3}, draw {:.3} -> {}",
        trace.chance,
        trace.gate_draw,
        if trace.dispatched { "send" } else { "skip" }
    );
    match trace.asset {
        Some(asset) => println!("  sticker: {}", asset),
        None if trace.dispatched => println!("  sticker: none (no assets for label)"),
        None => println!("  sticker: none"),
    }
}

fn run_bulk(engine: &StickerEngine, text: &str, count: usize, rng: &mut StdRng) {
    let mut sampled: LabelMap<usize> = LabelMap::default();
    let mut sent: LabelMap<usize> = LabelMap::default();
    let mut passed = 0;
    let mut delivered = 0;

    for _ in 0..count {
        let trace = engine.trace(text, rng);
        sampled[trace.label] += 1;
        if trace.dispatched {
            passed += 1;
        }
        if trace.asset.is_some() {
            delivered += 1;
            sent[trace.label] += 1;
        }
    }

    println!("\n=== Bulk Dispatch: {} runs ===\n", count);
    println!(
        "Gate passed: {} ({:.1}%)",
        passed,
        100.0 * passed as f64 / count as f64
    );
    println!(
        "Stickers sent: {} ({:.1}%)",
        delivered,
        100.0 * delivered as f64 / count as f64
    );
    println!("\n  {:<8} {:>8} {:>8}", "label", "sampled", "sent");
    for label in EmotionLabel::ALL {
        if sampled[label] == 0 {
            continue;
        }
        println!("  {:<8} {:>8} {:>8}", label, sampled[label], sent[label]);
    }
    println!();
}
