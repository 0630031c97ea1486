//! Derived call-graph views over a merged profile.
//!
//! - `call_graph`: sorted frame lists, caller/callee lookups, per-file lines
//! - `prune`: predicate-driven reduction of the graph for focused rendering

pub mod call_graph;
pub mod prune;

pub use call_graph::{CallEdge, CallGraphView, FileAggregation, SortKey};
pub use prune::prune_call_graph;
