//! Stackprof Studio CLI
//!
//! Merges stackprof dumps collected from many processes and renders the
//! result as text reports, call graphs and flamegraphs.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use stackprof_studio::aggregator::{EdgePolicy, MergeOptions};
use stackprof_studio::commands::{
    display_version, execute_merge, execute_report, validate_dump_file, MergeArgs, ReportArgs,
    ReportFormat,
};
use stackprof_studio::flamegraph::{FlamegraphConfig, StackOrder};
use stackprof_studio::output::{GraphvizOptions, TextReportOptions};
use stackprof_studio::utils::config::{DEFAULT_FLAMEGRAPH_TITLE, DEFAULT_FLAMEGRAPH_WIDTH};

/// Stackprof Studio - merge and report on stackprof dumps
#[derive(Parser, Debug)]
#[command(name = "stackprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by commands that merge
#[derive(Args, Debug)]
struct MergeFlags {
    /// How call edges of duplicate frames are treated
    #[arg(long, value_enum)]
    edges: Option<EdgePolicy>,

    /// Keep identical raw stacks as separate records
    #[arg(long)]
    no_dedup: bool,
}

impl MergeFlags {
    fn to_options(&self, default_policy: EdgePolicy) -> MergeOptions {
        MergeOptions::new()
            .with_edge_policy(self.edges.unwrap_or(default_policy))
            .with_dedup(!self.no_dedup)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge dumps into one dump file
    Merge {
        /// Dump files or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output path for the merged dump
        #[arg(short, long, default_value = "merged.json")]
        output: PathBuf,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        merge: MergeFlags,
    },

    /// Load, merge and render dumps
    Report {
        /// Dump files or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        merge: MergeFlags,

        /// Sort frames by total instead of self samples
        #[arg(long)]
        sort_total: bool,

        /// Maximum number of rows (or graph nodes)
        #[arg(long)]
        limit: Option<usize>,

        /// Only frames from files starting with this prefix
        #[arg(long)]
        select_file: Vec<String>,

        /// Skip frames from files starting with this prefix
        #[arg(long)]
        reject_file: Vec<String>,

        /// Only frames whose name contains this
        #[arg(long)]
        select_name: Vec<String>,

        /// Skip frames whose name contains this
        #[arg(long)]
        reject_name: Vec<String>,

        /// Method name substring for the method format
        #[arg(short, long)]
        method: Option<String>,

        /// Graphviz: focus on frames whose name contains this
        #[arg(long)]
        filter: Option<String>,

        /// Graphviz: drop nodes below this share of all samples
        #[arg(long)]
        node_fraction: Option<f64>,

        /// Flamegraph stack order (d3 output is always alphabetical)
        #[arg(long, value_enum, default_value = "timeline")]
        order: StackOrder,

        /// Flamegraph: keep rows spanning the full width
        #[arg(long)]
        keep_common: bool,

        /// Flamegraph title
        #[arg(long, default_value = DEFAULT_FLAMEGRAPH_TITLE)]
        title: String,

        /// Flamegraph width in pixels
        #[arg(long, default_value_t = DEFAULT_FLAMEGRAPH_WIDTH)]
        width: usize,
    },

    /// Validate a dump file
    Validate {
        /// Path to dump JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Merge {
            inputs,
            output,
            compact,
            merge,
        } => {
            let args = MergeArgs {
                inputs,
                output,
                options: merge.to_options(EdgePolicy::Preserve),
                compact,
            };
            execute_merge(args)?;
        }

        Commands::Report {
            inputs,
            format,
            output,
            merge,
            sort_total,
            limit,
            select_file,
            reject_file,
            select_name,
            reject_name,
            method,
            filter,
            node_fraction,
            order,
            keep_common,
            title,
            width,
        } => {
            let args = ReportArgs {
                inputs,
                format,
                output,
                merge_options: merge.to_options(EdgePolicy::Rename),
                text: TextReportOptions {
                    sort_by_total: sort_total,
                    limit,
                    select_files: select_file,
                    reject_files: reject_file,
                    select_names: select_name,
                    reject_names: reject_name,
                },
                graphviz: GraphvizOptions {
                    filter,
                    limit,
                    node_fraction,
                },
                method,
                order,
                skip_common: !keep_common,
                flamegraph_config: FlamegraphConfig::new().with_title(title).with_width(width),
            };
            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_dump_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
