//! Dump loading: JSON bytes, files, URLs and batches of them.
//!
//! Loading never fails because of the raw corpus alone: a corpus that does
//! not decode, or that references a frame id missing from the frame table, is
//! dropped with a warning and the rest of the dump is kept.

use super::schema::{DumpFile, Profile};
use crate::aggregator::codec;
use crate::remote::DumpClient;
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a dump comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSource {
    File(PathBuf),
    Url(String),
    Memory(Vec<u8>),
}

impl DumpSource {
    /// `http(s)://` arguments become URLs, anything else a file path
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            DumpSource::Url(arg.to_string())
        } else {
            DumpSource::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DumpSource::File(path) => path.display().to_string(),
            DumpSource::Url(url) => url.clone(),
            DumpSource::Memory(bytes) => format!("<memory, {} bytes>", bytes.len()),
        }
    }
}

/// A source that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub source: DumpSource,
    pub error: LoadError,
}

/// Parse a JSON dump into a `Profile`
///
/// **Public** - main entry point for loading
///
/// # Errors
/// * `LoadError::Json` - not a stackprof JSON dump
/// * `LoadError::InvalidDump` - the header is unusable
pub fn load_dump_bytes(bytes: &[u8]) -> Result<Profile, LoadError> {
    let dump: DumpFile = serde_json::from_slice(bytes)?;
    profile_from_dump(dump)
}

/// Read and parse a dump file
pub fn load_dump_file(path: impl AsRef<Path>) -> Result<Profile, LoadError> {
    let path = path.as_ref();
    debug!("Reading dump from {}", path.display());
    let bytes = fs::read(path)?;
    load_dump_bytes(&bytes)
}

/// Convert the on-disk layout into a `Profile`
pub fn profile_from_dump(dump: DumpFile) -> Result<Profile, LoadError> {
    if !dump.version.is_finite() || dump.version <= 0.0 {
        return Err(LoadError::InvalidDump(format!(
            "unsupported version {}",
            dump.version
        )));
    }

    if let Some(frame) = dump
        .frames
        .iter()
        .find(|f| f.total_samples < f.self_samples)
    {
        return Err(LoadError::InvalidDump(format!(
            "frame {} has total_samples {} below samples {}",
            frame.id, frame.total_samples, frame.self_samples
        )));
    }

    let mut profile = Profile::new(dump.version, dump.mode, dump.interval);
    profile.samples = dump.samples;
    profile.gc_samples = dump.gc_samples;
    profile.missed_samples = dump.missed_samples;
    profile.frames = dump.frames;
    profile.raw_timestamp_deltas = dump.raw_timestamp_deltas;

    if let Some(flat) = dump.raw {
        match codec::decode(&flat) {
            Ok(stacks) => profile.raw = Some(stacks),
            Err(e) => warn!("Dropping raw samples: {}", e),
        }
    }

    if let Some(id) = profile.dangling_raw_reference() {
        warn!("Dropping raw samples: frame {} is not in the frame table", id);
        profile.raw = None;
    }

    debug!(
        "Loaded {} profile with {} frames, {} samples",
        profile.modeline(),
        profile.frames.len(),
        profile.samples
    );
    Ok(profile)
}

/// Convert a `Profile` into the on-disk layout, re-encoding the raw corpus
pub fn profile_to_dump(profile: &Profile) -> DumpFile {
    DumpFile {
        version: profile.version,
        mode: profile.mode,
        interval: profile.interval,
        samples: profile.samples,
        gc_samples: profile.gc_samples,
        missed_samples: profile.missed_samples,
        frames: profile.frames.clone(),
        raw: profile.raw.as_deref().map(codec::encode),
        raw_timestamp_deltas: profile.raw_timestamp_deltas.clone(),
    }
}

/// Load one source; URLs go through `client`
pub fn load_source(source: &DumpSource, client: Option<&DumpClient>) -> Result<Profile, LoadError> {
    match source {
        DumpSource::File(path) => load_dump_file(path),
        DumpSource::Memory(bytes) => load_dump_bytes(bytes),
        DumpSource::Url(url) => match client {
            Some(client) => client.fetch(url),
            None => DumpClient::new()?.fetch(url),
        },
    }
}

/// Load every source, skipping (and logging) the ones that fail.
///
/// Returns the loaded profiles in source order and the failures.
pub fn batch_load(sources: &[DumpSource]) -> (Vec<Profile>, Vec<LoadFailure>) {
    let needs_client = sources.iter().any(|s| matches!(s, DumpSource::Url(_)));
    let client = if needs_client {
        match DumpClient::new() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("HTTP client unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut profiles = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();

    for source in sources {
        match load_source(source, client.as_ref()) {
            Ok(profile) => profiles.push(profile),
            Err(error) => {
                warn!("Skipping {}: {}", source.describe(), error);
                failures.push(LoadFailure {
                    source: source.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "Loaded {} of {} dumps ({} skipped)",
        profiles.len(),
        sources.len(),
        failures.len()
    );
    (profiles, failures)
}
