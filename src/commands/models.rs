use crate::aggregator::{EdgePolicy, MergeOptions};
use crate::flamegraph::{FlamegraphConfig, StackOrder};
use crate::output::{GraphvizOptions, TextReportOptions};
use clap::ValueEnum;
use std::path::PathBuf;

/// Arguments for the merge command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Dump files or URLs, in merge order
    pub inputs: Vec<String>,

    /// Output path for the merged dump
    pub output: PathBuf,

    pub options: MergeOptions,

    /// Write single-line JSON
    pub compact: bool,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("merged.json"),
            options: MergeOptions::default(),
            compact: false,
        }
    }
}

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Frame table sorted by self or total samples
    #[default]
    Text,
    /// Callers, callees and lines of matching methods
    Method,
    /// Per-file sample totals
    Files,
    /// Graphviz DOT call graph
    Graphviz,
    /// Callgrind profile
    Callgrind,
    /// `a;b;c weight` lines
    Stackcollapse,
    /// Rectangle rows for the browser flamegraph viewer
    Flamegraph,
    /// SVG flamegraph
    Svg,
    /// Nested JSON tree for d3-flame-graph
    D3,
    /// Merged JSON dump
    Json,
}

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Dump files or URLs; several are merged first
    pub inputs: Vec<String>,

    pub format: ReportFormat,

    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,

    pub merge_options: MergeOptions,
    pub text: TextReportOptions,
    pub graphviz: GraphvizOptions,

    /// Method name substring for `method`
    pub method: Option<String>,

    pub order: StackOrder,
    pub skip_common: bool,
    pub flamegraph_config: FlamegraphConfig,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            format: ReportFormat::Text,
            output: None,
            merge_options: MergeOptions::default().with_edge_policy(EdgePolicy::Rename),
            text: TextReportOptions::default(),
            graphviz: GraphvizOptions::default(),
            method: None,
            order: StackOrder::Timeline,
            skip_common: true,
            flamegraph_config: FlamegraphConfig::default(),
        }
    }
}
