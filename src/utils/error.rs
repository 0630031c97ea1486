//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while decoding a flat raw-stack corpus
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed raw corpus at offset {offset}: {reason}")]
    MalformedCorpus { offset: usize, reason: String },
}

/// Errors that can occur while merging profiles
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Incompatible profiles: {0}")]
    IncompatibleProfiles(String),

    #[error("No profiles to merge")]
    NoProfiles,
}

/// Errors that can occur while loading a single dump source
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid dump: {0}")]
    InvalidDump(String),
}

/// Errors that can occur while rendering a profile
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Profile does not include raw samples (enable raw stack retention when collecting)")]
    MissingRawSamples,

    #[error("No stacks to render")]
    EmptyStacks,

    #[error("SVG generation failed: {0}")]
    Svg(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid dump: {0}")]
    InvalidDump(#[from] LoadError),
}
