//! Stackprof Studio
//!
//! Merging and reporting for stackprof sampling-profiler dumps.
//!
//! Dumps collected from many processes use process-local frame ids. This
//! crate canonicalizes frames by content, merges frame tables and raw stack
//! corpora without losing sample weight, and renders the result.
//!
//! ## Getting Started
//!
//! ```bash
//! stackprof merge tmp/stackprof-*.json -o merged.json
//! stackprof report merged.json --format svg -o flamegraph.svg
//! ```
//!
//! Library users start from `parser::batch_load` and
//! `aggregator::merge_profiles`.

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod remote;
pub mod report;
pub mod utils;
