/// Lexicon Linter: validates cue coverage and sticker pool wiring.
///
/// Usage: lexicon_linter [--lexicon <path>] [--pool <path>] [--no-defaults]

use std::collections::HashSet;
use std::path::Path;
use std::process;

use sticker_engine::core::lexicon::CueLexicon;
use sticker_engine::schema::asset::AssetPool;
use sticker_engine::schema::emotion::EmotionLabel;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        process::exit(0);
    }

    let mut lexicon_path = None;
    let mut pool_path = None;
    let mut use_defaults = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lexicon" if i + 1 < args.len() => {
                i += 1;
                lexicon_path = Some(args[i].clone());
            }
            "--pool" if i + 1 < args.len() => {
                i += 1;
                pool_path = Some(args[i].clone());
            }
            "--no-defaults" => use_defaults = false,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut lexicon = if use_defaults {
        CueLexicon::default()
    } else {
        CueLexicon::empty()
    };
    if let Some(ref path) = lexicon_path {
        match CueLexicon::load_from_ron(Path::new(path)) {
            Ok(loaded) => lexicon.merge(loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load lexicon '{}': {}", path, e);
                process::exit(1);
            }
        }
    }

    let mut load_errors = Vec::new();
    let pool = match pool_path {
        Some(ref path) => match load_pool(Path::new(path)) {
            Ok(pool) => Some(pool),
            Err(e) => {
                load_errors.push(e);
                None
            }
        },
        None => None,
    };

    let cue_total: usize = EmotionLabel::CUED
        .iter()
        .map(|label| lexicon.cues(*label).len())
        .sum();
    println!("Loaded {} cues", cue_total);
    if let Some(ref pool) = pool {
        println!("Loaded {} sticker keys", pool.total_assets());
    }

    let (mut errors, mut warnings) = lint_lexicon(&lexicon);
    errors.extend(load_errors);
    if let Some(ref pool) = pool {
        let (pool_errors, pool_warnings) = lint_pool(pool);
        errors.extend(pool_errors);
        warnings.extend(pool_warnings);
    }

    println!("\n=== Lexicon Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn print_usage() {
    println!("Usage: lexicon_linter [--lexicon <path>] [--pool <path>] [--no-defaults]");
    println!();
    println!("  --lexicon <path>   RON cue lexicon layered over the built-in cues");
    println!("  --pool <path>      RON sticker pool file or directory of pool files");
    println!("  --no-defaults      lint the lexicon file on its own");
}

fn load_pool(path: &Path) -> Result<AssetPool, String> {
    if !path.exists() {
        return Err(format!("Pool path '{}' does not exist", path.display()));
    }
    AssetPool::load_from_path(path)
        .map_err(|e| format!("Failed to load pool '{}': {}", path.display(), e))
}

fn lint_lexicon(lexicon: &CueLexicon) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for label in EmotionLabel::CUED {
        let cues = lexicon.cues(label);
        if cues.is_empty() {
            errors.push(format!("Label '{}' has no cues and can only win by chance", label));
            continue;
        }

        let mut seen = HashSet::new();
        for cue in cues {
            if !seen.insert(cue.as_str()) {
                warnings.push(format!("Label '{}' lists cue '{}' more than once", label, cue));
            }
        }
    }

    for (cue, labels) in lexicon.shared_cues() {
        let names: Vec<&str> = labels.iter().map(|l| l.name()).collect();
        warnings.push(format!("Cue '{}' is shared by {}", cue, names.join(", ")));
    }

    // A cue that contains another label's cue always scores both labels
    for label in EmotionLabel::CUED {
        for other in EmotionLabel::CUED {
            if other == label {
                continue;
            }
            for cue in lexicon.cues(label) {
                for inner in lexicon.cues(other) {
                    if cue != inner && cue.contains(inner.as_str()) {
                        warnings.push(format!(
                            "Cue '{}' ({}) contains '{}' ({})",
                            cue, label, inner, other
                        ));
                    }
                }
            }
        }
    }

    (errors, warnings)
}

fn lint_pool(pool: &AssetPool) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let neutral_usable = pool
        .group(EmotionLabel::Neutral)
        .map_or(false, |group| !group.is_empty());

    for label in pool.empty_labels() {
        match pool.group(label) {
            Some(_) => warnings.push(format!(
                "Label '{}' has an empty sticker group and never dispatches",
                label
            )),
            None if label.is_neutral() => errors.push(
                "No neutral sticker group; labels without a group cannot fall back".to_string(),
            ),
            None if !neutral_usable => warnings.push(format!(
                "Label '{}' has no sticker group and no usable neutral fallback",
                label
            )),
            None => {}
        }
    }

    let mut keys: Vec<&str> = pool
        .groups
        .values()
        .flatten()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    keys.dedup();
    if !pool.sources.is_empty() {
        for key in keys {
            if pool.source_for(key).is_none() {
                warnings.push(format!("Sticker '{}' has no source", key));
            }
        }
    }

    (errors, warnings)
}
