use crate::parser::load_dump_file;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a dump file and print its summary
pub fn validate_dump_file(file_path: &Path) -> Result<()> {
    println!("Validating dump: {}", file_path.display());

    let profile = load_dump_file(file_path)
        .with_context(|| format!("Failed to load {}", file_path.display()))?;

    println!("✓ Valid stackprof dump");
    println!("  Version: {}", profile.version);
    println!("  Mode: {}", profile.modeline());
    println!("  Samples: {} ({} gc, {} missed)", profile.samples, profile.gc_samples, profile.missed_samples);
    println!("  Frames: {}", profile.frames.len());
    match &profile.raw {
        Some(raw) => println!("  Raw stacks: {} ({} samples)", raw.len(), profile.raw_weight()),
        None => println!("  Raw stacks: none"),
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Stackprof Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Dump Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Merge stackprof dumps and render call graphs and flamegraphs.");
}
