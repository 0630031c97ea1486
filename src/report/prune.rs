//! Subgraph pruning for focused call-graph rendering.
//!
//! Starting from the frames whose name matches a predicate, callees are
//! pulled in transitively when the calling edge carries almost all of the
//! callee's total weight (`edge >= total / PRUNE_FACTOR`). The result keeps
//! only marked frames and drops every edge that leaves the marked set.

use super::call_graph::{CallGraphView, SortKey};
use crate::parser::schema::Frame;
use crate::utils::config::PRUNE_FACTOR;
use log::debug;
use std::collections::HashSet;

/// Mark-and-sweep the call graph from the frames matching `matches`.
///
/// Returns owned copies of the marked frames, heaviest total first, with
/// edges restricted to marked targets.
pub fn prune_call_graph<F>(view: &CallGraphView<'_>, matches: F) -> Vec<Frame>
where
    F: Fn(&str) -> bool,
{
    let list = view.sorted_frames(SortKey::TotalSamples);

    let mut stack: Vec<u64> = view
        .frames_matching(&matches)
        .into_iter()
        .map(|frame| frame.id)
        .collect();
    let mut marked: HashSet<u64> = HashSet::with_capacity(stack.len());

    while let Some(id) = stack.pop() {
        if !marked.insert(id) {
            continue;
        }
        let Some(edges) = view.frame(id).and_then(|f| f.edges.as_ref()) else {
            continue;
        };
        for (&callee, &weight) in edges {
            if let Some(target) = view.frame(callee) {
                if is_dominated_by(target.total_samples, weight) {
                    stack.push(callee);
                }
            }
        }
    }

    debug!("Pruned call graph to {} of {} frames", marked.len(), list.len());

    list.into_iter()
        .filter(|frame| marked.contains(&frame.id))
        .map(|frame| {
            let mut kept = frame.clone();
            if let Some(edges) = kept.edges.as_mut() {
                edges.retain(|callee, _| marked.contains(callee));
            }
            kept
        })
        .collect()
}

fn is_dominated_by(callee_total: u64, edge_weight: u64) -> bool {
    callee_total as f64 <= edge_weight as f64 * PRUNE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Mode, Profile};

    fn graph() -> Profile {
        let mut profile = Profile::new(1.2, Mode::Cpu, 1000);
        profile.frames.insert(
            Frame::new(1, "main", "app.rb", Some(1))
                .with_samples(0, 100)
                .with_edge(2, 60)
                .with_edge(3, 40),
        );
        profile.frames.insert(
            Frame::new(2, "render", "view.rb", Some(1))
                .with_samples(10, 60)
                .with_edge(3, 5)
                .with_edge(4, 50),
        );
        // shared helper: render's edge is far below its total
        profile.frames.insert(
            Frame::new(3, "query", "db.rb", Some(1))
                .with_samples(40, 40),
        );
        profile.frames.insert(
            Frame::new(4, "template", "view.rb", Some(9))
                .with_samples(50, 55),
        );
        profile
    }

    #[test]
    fn test_pulls_dominated_callees() {
        let profile = graph();
        let view = CallGraphView::new(&profile);

        let pruned = prune_call_graph(&view, |name| name == "render");
        let names: Vec<&str> = pruned.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["render", "template"]);
        assert_eq!(pruned[0].edges.as_ref().unwrap().get(&4), Some(&50));
    }

    #[test]
    fn test_drops_edges_to_unmarked_frames() {
        let profile = graph();
        let view = CallGraphView::new(&profile);

        let pruned = prune_call_graph(&view, |name| name == "render");
        let render = pruned.iter().find(|f| f.name == "render").unwrap();
        let targets: Vec<u64> = render.edges.as_ref().unwrap().keys().copied().collect();
        assert_eq!(targets, vec![4]);
        assert!(pruned.iter().all(|f| f.name != "query"));
    }

    #[test]
    fn test_matching_root_pulls_whole_tree() {
        let profile = graph();
        let view = CallGraphView::new(&profile);

        let pruned = prune_call_graph(&view, |name| name == "main");
        assert_eq!(pruned.len(), 4);
    }

    #[test]
    fn test_no_match_is_empty() {
        let profile = graph();
        let view = CallGraphView::new(&profile);
        assert!(prune_call_graph(&view, |_| false).is_empty());
    }

    #[test]
    fn test_all_match_keeps_graph() {
        let profile = graph();
        let view = CallGraphView::new(&profile);

        let pruned = prune_call_graph(&view, |_| true);
        let expected: Vec<Frame> = view
            .sorted_frames(SortKey::TotalSamples)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(pruned, expected);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut profile = Profile::new(1.2, Mode::Cpu, 1000);
        profile.frames.insert(
            Frame::new(1, "a", "x.rb", Some(1))
                .with_samples(1, 10)
                .with_edge(2, 10),
        );
        profile.frames.insert(
            Frame::new(2, "b", "x.rb", Some(2))
                .with_samples(1, 10)
                .with_edge(1, 10),
        );
        let view = CallGraphView::new(&profile);

        assert_eq!(prune_call_graph(&view, |name| name == "a").len(), 2);
    }
}
