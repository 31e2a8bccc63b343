use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use wordnet_convert::{ConvertOptions, LoadMode, MemorySink, convert_dir};

fn main() -> Result<()> {
    init_tracing();

    let dict_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var("WORDNET_DIR").ok().map(PathBuf::from))
        .context("usage: cargo run -p wordnet-convert --example convert -- <path-to-wordnet-dir>")?;

    let options = ConvertOptions {
        error_limit: env::var("WORDNET_ERROR_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0),
        load_mode: env::var("WORDNET_LOAD_MODE")
            .ok()
            .as_deref()
            .and_then(parse_load_mode)
            .unwrap_or(LoadMode::Mmap),
        parallel_data: env::var("WORDNET_PARALLEL").is_ok_and(|v| v == "1"),
    };

    let mut sink = MemorySink::new();
    let summary = convert_dir(&dict_dir, &mut sink, options)
        .with_context(|| format!("converting WordNet from {}", dict_dir.display()))?;

    println!("Dictionary: {}", dict_dir.display());
    for file in &summary.files {
        println!(
            "{:<12} lines {:>7}  records {:>7}  errors {:>5}",
            file.name, file.lines, file.records, file.errors
        );
    }
    println!("Sense index entries: {}", summary.senses);

    // Spot-check a couple of keys.
    for (file, key) in [("index.noun", "dog%n"), ("verb.exc", "ran%v")] {
        println!("{file} {key}: {:?}", sink.get(file, key));
    }

    Ok(())
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
