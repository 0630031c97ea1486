//! Merging of profiler dumps into one canonical profile.
//!
//! This module covers:
//! - The run-length raw stack codec
//! - Content-based frame canonicalization across dumps
//! - Multi-dump merging and raw stack deduplication
//! - Collapsed stack lines built from a profile's raw corpus

pub mod canonicalize;
pub mod codec;
pub mod merger;
pub mod stack_builder;

// Re-export main types and functions
pub use canonicalize::{rewrite_stacks, Canonicalizer, EdgePolicy, FrameIdentity, RenameMap};
pub use codec::{decode, encode, RawStackReader};
pub use merger::{dedup_raw_stacks, merge_frame_tables, merge_profiles, MergeOptions};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
