//! Configuration and constants for the CLI and library.

use std::time::Duration;

/// Default timeout for fetching remote dumps
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Dump format version reported by `stackprof version`
pub const SCHEMA_VERSION: &str = "1.2";

/// Profiles at this version record line weights as self-only scalars
pub const SCALAR_LINES_VERSION: f64 = 1.0;

// A callee is pulled into a pruned graph when its caller accounts for at
// least total / PRUNE_FACTOR of its samples
pub const PRUNE_FACTOR: f64 = 1.2;

/// Label of the synthetic flame tree root
pub const FLAME_ROOT_LABEL: &str = "<root>";

/// Default SVG flamegraph width in pixels
pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;

/// Default SVG flamegraph title
pub const DEFAULT_FLAMEGRAPH_TITLE: &str = "stackprof";
