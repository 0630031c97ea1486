//! Plain-text reports: frame table, method detail, file summary.

use super::percent;
use crate::parser::schema::{Frame, LineWeight};
use crate::report::{CallGraphView, SortKey};
use crate::utils::config::SCALAR_LINES_VERSION;
use std::cmp::Reverse;

const RULE: &str = "==================================";

/// Filters and ordering for the frame table
#[derive(Debug, Clone, Default)]
pub struct TextReportOptions {
    pub sort_by_total: bool,
    pub limit: Option<usize>,

    /// Keep frames whose file starts with any of these prefixes
    pub select_files: Vec<String>,
    pub reject_files: Vec<String>,

    /// Keep frames whose name contains any of these substrings
    pub select_names: Vec<String>,
    pub reject_names: Vec<String>,
}

impl TextReportOptions {
    fn keeps(&self, frame: &Frame) -> bool {
        (self.select_files.is_empty() || file_in(frame, &self.select_files))
            && (self.select_names.is_empty() || name_in(frame, &self.select_names))
            && !file_in(frame, &self.reject_files)
            && !name_in(frame, &self.reject_names)
    }
}

fn file_in(frame: &Frame, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| frame.file.starts_with(p.as_str()))
}

fn name_in(frame: &Frame, needles: &[String]) -> bool {
    needles.iter().any(|n| frame.name.contains(n.as_str()))
}

/// Render the header and the per-frame `TOTAL / SAMPLES / FRAME` table
pub fn render_text(view: &CallGraphView<'_>, options: &TextReportOptions) -> String {
    let profile = view.profile();
    let overall = profile.samples;
    let mut output = String::new();

    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!("  Mode: {}\n", profile.modeline()));
    output.push_str(&format!(
        "  Samples: {} ({:.2}% miss rate)\n",
        overall,
        percent(profile.missed_samples, profile.missed_samples + overall)
    ));
    output.push_str(&format!(
        "  GC: {} ({:.2}%)\n",
        profile.gc_samples,
        percent(profile.gc_samples, overall)
    ));
    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!("{:>10}    (pct)  {:>10}    (pct)     FRAME\n", "TOTAL", "SAMPLES"));

    let key = if options.sort_by_total {
        SortKey::TotalSamples
    } else {
        SortKey::SelfSamples
    };
    let rows = view
        .sorted_frames(key)
        .into_iter()
        .filter(|frame| options.keeps(frame))
        .take(options.limit.unwrap_or(usize::MAX));

    for frame in rows {
        output.push_str(&format!(
            "{:>10} {:>8}  {:>10} {:>8}     {}\n",
            frame.total_samples,
            format!("({:.1}%)", percent(frame.total_samples, overall)),
            frame.self_samples,
            format!("({:.1}%)", percent(frame.self_samples, overall)),
            frame.name
        ));
    }

    output
}

/// Render callers, callees and line weights of every frame whose name
/// contains `needle`
pub fn render_method(view: &CallGraphView<'_>, needle: &str) -> String {
    let overall = view.profile().samples;
    let scalar_lines = view.profile().version <= SCALAR_LINES_VERSION;
    let mut output = String::new();

    for frame in view.profile().frames.iter().filter(|f| f.name.contains(needle)) {
        let line = frame.line.unwrap_or(1);
        output.push_str(&format!("{} ({}:{})\n", frame.name, frame.file, line));
        output.push_str(&format!(
            "  samples: {:>5} self ({:.1}%)  /  {:>5} total ({:.1}%)\n",
            frame.self_samples,
            percent(frame.self_samples, overall),
            frame.total_samples,
            percent(frame.total_samples, overall)
        ));

        let mut callers = view.callers_of(frame.id).to_vec();
        if !callers.is_empty() {
            output.push_str("  callers:\n");
            callers.sort_by_key(|edge| Reverse(edge.weight));
            for edge in callers {
                output.push_str(&format!(
                    "   {:>5}  ({:>8})  {}\n",
                    edge.weight,
                    format!("{:.1}%", percent(edge.weight, frame.total_samples)),
                    edge.name
                ));
            }
        }

        if frame.edges.is_some() {
            let children = frame.total_samples.saturating_sub(frame.self_samples);
            output.push_str(&format!("  callees ({} total):\n", children));
            for edge in view.callees_of(frame.id) {
                output.push_str(&format!(
                    "   {:>5}  ({:>8})  {}\n",
                    edge.weight,
                    format!("{:.1}%", percent(edge.weight, children)),
                    edge.name
                ));
            }
        }

        if let Some(lines) = &frame.lines {
            output.push_str("  lines:\n");
            for (&number, &weight) in lines {
                output.push_str(&render_line_weight(number, weight, overall, scalar_lines));
            }
        }
    }

    output
}

fn render_line_weight(number: u64, weight: LineWeight, overall: u64, scalar: bool) -> String {
    if scalar {
        let samples = weight.total_samples();
        return format!(
            "{:>5} {:>7}  | {:>5}\n",
            samples,
            format!("({:.1}%)", percent(samples, overall)),
            number
        );
    }

    let (total, own) = (weight.total_samples(), weight.self_samples());
    if own > 0 {
        format!(
            "{:>5}  {:>8} / {:>5}  {:>7}  | {:>5}\n",
            total,
            format!("({:.1}%)", percent(total, overall)),
            own,
            format!("({:.1}%)", percent(own, overall)),
            number
        )
    } else {
        format!(
            "{:>5}  {:>8}                   | {:>5}\n",
            total,
            format!("({:.1}%)", percent(total, overall)),
            number
        )
    }
}

/// Render per-file `total / self` sums, heaviest self first
pub fn render_files(view: &CallGraphView<'_>, limit: Option<usize>) -> String {
    let overall = view.profile().samples;
    let mut output = String::new();

    for (file, total, own) in view.file_totals().into_iter().take(limit.unwrap_or(usize::MAX)) {
        output.push_str(&format!(
            "{:>5}  ({:>5.1}%) / {:>5}  ({:>5.1}%)   {}\n",
            total,
            percent(total, overall),
            own,
            percent(own, overall),
            file
        ));
    }

    output
}
