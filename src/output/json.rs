//! JSON dump writer and reader.
//!
//! Dumps are written in the same layout they are loaded from, so a merged
//! profile can be fed back into any reader of the format.

use super::create_output_file;
use crate::parser::dump_reader::{profile_from_dump, profile_to_dump};
use crate::parser::schema::{DumpFile, Profile};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Write a profile to a JSON dump file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `profile` - Profile to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_dump(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_with(profile, output_path.as_ref(), true)
}

/// Write a profile as compact JSON (no formatting)
pub fn write_dump_compact(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_with(profile, output_path.as_ref(), false)
}

fn write_with(profile: &Profile, output_path: &Path, pretty: bool) -> Result<(), OutputError> {
    info!("Writing dump to: {}", output_path.display());

    let dump = profile_to_dump(profile);
    let mut writer = create_output_file(output_path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &dump)?;
    } else {
        serde_json::to_writer(&mut writer, &dump)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        "Dump written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );
    Ok(())
}

/// Serialize a profile to a dump string
pub fn dump_to_string(profile: &Profile) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&profile_to_dump(profile))?)
}

/// Read a dump file written by `write_dump`
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::InvalidDump` - the dump content is unusable
pub fn read_dump(input_path: impl AsRef<Path>) -> Result<Profile, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading dump from: {}", input_path.display());

    let file = File::open(input_path)?;
    let dump: DumpFile = serde_json::from_reader(BufReader::new(file))?;
    let profile = profile_from_dump(dump)?;

    debug!("Dump loaded: {}, {} frames", profile.modeline(), profile.frames.len());
    Ok(profile)
}
