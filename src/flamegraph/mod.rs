//! Flamegraph construction and rendering.
//!
//! - `tree`: weighted call tree rebuilt from the raw corpus
//! - `rows`: rectangle layout for the browser viewer
//! - `generator`: SVG (via inferno) and d3 JSON output

pub mod generator;
pub mod rows;
pub mod tree;

// Re-export main types
pub use generator::{generate_d3_json, generate_flamegraph, FlamegraphConfig};
pub use rows::{flamegraph_rows, render_flamegraph_script, FlameRow};
pub use tree::{build_flame_tree, flame_tree_from_stacks, FlameNode, StackOrder};
