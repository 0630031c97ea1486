//! Callgrind output, readable by KCachegrind/QCachegrind.

use crate::report::{CallGraphView, SortKey};

/// Render the profile in callgrind format
pub fn render_callgrind(view: &CallGraphView<'_>) -> String {
    let profile = view.profile();
    let mut output = String::new();

    output.push_str("version: 1\n");
    output.push_str("creator: stackprof\n");
    output.push_str("pid: 0\n");
    output.push_str("cmd: ruby\n");
    output.push_str("part: 1\n");
    output.push_str(&format!("desc: mode: {}\n", profile.modeline()));
    output.push_str(&format!("desc: missed: {}\n", profile.missed_samples));
    output.push_str("positions: line\n");
    output.push_str("events: Instructions\n");
    output.push_str(&format!("summary: {}\n", profile.samples));

    for frame in view.sorted_frames(SortKey::SelfSamples) {
        output.push_str(&format!("fl={}\n", frame.file));
        output.push_str(&format!("fn={}\n", frame.name));

        if let Some(lines) = &frame.lines {
            for (line, weight) in lines {
                output.push_str(&format!("{} {}\n", line, weight.self_samples()));
            }
        }

        if let Some(edges) = &frame.edges {
            for (&callee, &weight) in edges {
                let Some(target) = view.frame(callee) else {
                    continue;
                };
                if target.file != frame.file {
                    output.push_str(&format!("cfl={}\n", target.file));
                }
                output.push_str(&format!("cfn={}\n", target.name));
                output.push_str(&format!(
                    "calls={} {}\n{} {}\n",
                    weight,
                    frame.line.unwrap_or(0),
                    target.line.unwrap_or(0),
                    weight
                ));
            }
        }

        output.push('\n');
    }

    output.push_str(&format!("totals: {}\n", profile.samples));
    output
}
