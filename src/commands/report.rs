//! Report command implementation.
//!
//! Loads and merges the inputs, renders them in the requested format, and
//! writes the result to a file or stdout.

use super::merge::{load_and_merge, validate_inputs};
use super::models::{ReportArgs, ReportFormat};
use crate::aggregator::build_collapsed_stacks;
use crate::flamegraph::{
    build_flame_tree, flamegraph_rows, generate_d3_json, generate_flamegraph, render_flamegraph_script,
    StackOrder,
};
use crate::output::{
    dump_to_string, render_callgrind, render_files, render_graphviz, render_method,
    render_stackcollapse, render_text, write_svg, write_text,
};
use crate::parser::schema::Profile;
use crate::report::CallGraphView;
use anyhow::{bail, Context, Result};
use log::info;
use std::io::Write;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
pub fn execute_report(args: ReportArgs) -> Result<()> {
    validate_inputs(&args.inputs)?;

    let profile = load_and_merge(&args.inputs, &args.merge_options)?;
    let rendered = render_report(&profile, &args)?;

    match &args.output {
        Some(path) if args.format == ReportFormat::Svg => {
            write_svg(&rendered, path).context("Failed to write flamegraph SVG")?;
            info!("✓ Flamegraph written to: {}", path.display());
        }
        Some(path) => {
            write_text(&rendered, path).context("Failed to write report")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write report to stdout")?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// Render a profile in the format selected by `args`
///
/// **Public** - the render step of `execute_report`, usable on its own
pub fn render_report(profile: &Profile, args: &ReportArgs) -> Result<String> {
    let view = CallGraphView::new(profile);

    let rendered = match args.format {
        ReportFormat::Text => render_text(&view, &args.text),
        ReportFormat::Method => {
            let Some(needle) = args.method.as_deref() else {
                bail!("The method format needs --method <NAME>");
            };
            let rendered = render_method(&view, needle);
            if rendered.is_empty() {
                bail!("No frame name contains '{}'", needle);
            }
            rendered
        }
        ReportFormat::Files => render_files(&view, args.text.limit),
        ReportFormat::Graphviz => render_graphviz(&view, &args.graphviz),
        ReportFormat::Callgrind => render_callgrind(&view),
        ReportFormat::Stackcollapse => render_stackcollapse(profile)?,
        ReportFormat::Flamegraph => {
            let rows = flamegraph_rows(profile, args.order, args.skip_common)?;
            render_flamegraph_script(&rows)?
        }
        ReportFormat::Svg => {
            let stacks = build_collapsed_stacks(profile)?;
            let config = args
                .flamegraph_config
                .clone()
                .with_count_name(profile.mode.to_string());
            generate_flamegraph(&stacks, Some(&config)).context("Failed to generate flamegraph")?
        }
        ReportFormat::D3 => {
            // d3-flame-graph only lays out alphabetical stacks
            let tree = build_flame_tree(profile, StackOrder::Alphabetical)?;
            generate_d3_json(&tree)?
        }
        ReportFormat::Json => dump_to_string(profile)?,
    };

    Ok(rendered)
}
