//! Graphviz DOT call-graph renderer.

use super::percent;
use crate::parser::schema::Frame;
use crate::report::{prune_call_graph, CallGraphView, SortKey};
use std::collections::HashSet;

/// Node selection for the DOT output
#[derive(Debug, Clone, Default)]
pub struct GraphvizOptions {
    /// Only frames whose name contains this, plus the callees they dominate
    pub filter: Option<String>,

    /// Maximum number of nodes, heaviest total first
    pub limit: Option<usize>,

    /// Drop nodes whose total is below this share of all samples
    pub node_fraction: Option<f64>,
}

/// Render the call graph as a DOT digraph
pub fn render_graphviz(view: &CallGraphView<'_>, options: &GraphvizOptions) -> String {
    let overall = view.profile().samples;
    let max_self = view.max_self_samples().max(1);

    let list: Vec<Frame> = match &options.filter {
        Some(needle) => prune_call_graph(view, |name| name.contains(needle.as_str())),
        None => view
            .sorted_frames(SortKey::TotalSamples)
            .into_iter()
            .cloned()
            .collect(),
    };

    let node_minimum = options
        .node_fraction
        .map(|fraction| (fraction * overall as f64).ceil() as u64)
        .unwrap_or(0);

    let mut output = String::from("digraph profile {\n");
    output.push_str("Legend [shape=box,fontsize=24,shape=plaintext,label=\"");
    output.push_str(&format!("Total samples: {}\\l", overall));
    if let Some(limit) = options.limit {
        output.push_str(&format!("Showing top {} nodes\\l", limit));
    }
    if options.node_fraction.is_some() {
        output.push_str(&format!("Dropped nodes with < {} samples\\l", node_minimum));
    }
    output.push_str("\"];\n");

    let mut included: HashSet<u64> = HashSet::new();
    for (index, frame) in list.iter().enumerate() {
        let (call, total) = (frame.self_samples, frame.total_samples);
        if total < node_minimum || options.limit.is_some_and(|limit| index >= limit) {
            break;
        }

        let mut sample = String::new();
        if call < total {
            sample.push_str(&format!("{} ({:.1}%)\\rof ", call, percent(call, overall)));
        }
        sample.push_str(&format!("{} ({:.1}%)\\r", total, percent(total, overall)));

        let fontsize = call as f64 / max_self as f64 * 28.0 + 10.0;
        let size = percent(total, overall) / 100.0 * 2.0 + 0.5;
        output.push_str(&format!(
            "  \"{}\" [size={:.2}] [fontsize={:.2}] [penwidth=\"{:.2}\"] [shape=box] [label=\"{}\\n{}\"];\n",
            frame.id,
            size,
            fontsize,
            size,
            escape_label(&frame.name),
            sample
        ));
        included.insert(frame.id);
    }

    for frame in list.iter().filter(|f| included.contains(&f.id)) {
        let Some(edges) = &frame.edges else {
            continue;
        };
        for (&callee, &weight) in edges {
            if !included.contains(&callee) {
                continue;
            }
            let size = percent(weight, overall) / 100.0 * 2.0 + 0.5;
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"] [weight=\"{}\"] [penwidth=\"{:.2}\"];\n",
                frame.id, callee, weight, weight, size
            ));
        }
    }

    output.push_str("}\n");
    output
}

fn escape_label(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
