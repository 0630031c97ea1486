//! Merge command implementation.
//!
//! The merge command:
//! 1. Loads every dump (files and URLs), skipping the ones that fail
//! 2. Merges them into one canonical profile
//! 3. Writes the merged dump

use super::models::MergeArgs;
use crate::aggregator::{merge_profiles, MergeOptions};
use crate::output::{write_dump, write_dump_compact};
use crate::parser::schema::Profile;
use crate::parser::{batch_load, DumpSource};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the merge command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * No input dump could be loaded
/// * Inputs of different versions or modes
/// * File write errors
pub fn execute_merge(args: MergeArgs) -> Result<()> {
    let start_time = Instant::now();

    validate_inputs(&args.inputs)?;

    info!("Step 1/2: Loading and merging {} dumps...", args.inputs.len());
    let merged = load_and_merge(&args.inputs, &args.options)?;

    info!("Step 2/2: Writing merged dump...");
    if args.compact {
        write_dump_compact(&merged, &args.output)
    } else {
        write_dump(&merged, &args.output)
    }
    .context("Failed to write merged dump")?;

    info!("✓ Merged dump written to: {}", args.output.display());
    info!("Merge completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Load the inputs and merge whatever loaded successfully
///
/// **Public** - shared by the merge and report commands
pub fn load_and_merge(inputs: &[String], options: &MergeOptions) -> Result<Profile> {
    let sources: Vec<DumpSource> = inputs.iter().map(|arg| DumpSource::parse(arg)).collect();
    let (profiles, failures) = batch_load(&sources);

    if profiles.is_empty() {
        match failures.into_iter().next() {
            Some(failure) => {
                return Err(failure.error)
                    .with_context(|| format!("Failed to load {}", failure.source.describe()))
            }
            None => bail!("No dumps to load"),
        }
    }

    let merged = merge_profiles(&profiles, options).context("Failed to merge dumps")?;
    debug!(
        "Merged profile: {} frames, {} samples, {} raw records",
        merged.frames.len(),
        merged.samples,
        merged.raw.as_ref().map_or(0, Vec::len)
    );
    Ok(merged)
}

/// Validate command inputs before doing any work
pub fn validate_inputs(inputs: &[String]) -> Result<()> {
    if inputs.is_empty() {
        bail!("At least one dump file or URL is required");
    }
    if let Some(empty) = inputs.iter().position(|arg| arg.trim().is_empty()) {
        bail!("Input #{} is empty", empty + 1);
    }
    Ok(())
}
