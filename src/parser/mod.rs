//! Dump parsing and schema definitions.
//!
//! This module handles:
//! - Defining the profile model and the on-disk dump layout
//! - Loading dumps from bytes, files, URLs and batches of sources
//! - Dropping raw corpora that do not decode against their frame table

pub mod dump_reader;
pub mod schema;

// Re-export main types
pub use dump_reader::{
    batch_load, load_dump_bytes, load_dump_file, load_source, profile_from_dump, profile_to_dump,
    DumpSource, LoadFailure,
};
pub use schema::{DumpFile, Frame, FrameTable, LineWeight, Mode, Profile, RawStack};
