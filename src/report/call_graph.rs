//! Read-only call-graph indices over one profile.
//!
//! Every index is computed on first use and cached in the view. A view never
//! mutates its profile; build a new view for a new profile.

use crate::parser::schema::{Frame, LineWeight, Profile};
use std::cell::OnceCell;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Weight used to order frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    SelfSamples,
    TotalSamples,
}

/// One caller (or callee) of a frame and the weight of that edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEdge<'a> {
    pub id: u64,
    pub name: &'a str,
    pub weight: u64,
}

/// Per-file line weights, `file -> line -> weight`
pub type FileAggregation<'a> = BTreeMap<&'a str, BTreeMap<u64, LineWeight>>;

/// Lazily computed projection of a `Profile`
#[derive(Debug)]
pub struct CallGraphView<'a> {
    profile: &'a Profile,
    by_self: OnceCell<Vec<usize>>,
    by_total: OnceCell<Vec<usize>>,
    callers: OnceCell<HashMap<u64, Vec<CallEdge<'a>>>>,
    files: OnceCell<FileAggregation<'a>>,
    max_self: OnceCell<u64>,
}

impl<'a> CallGraphView<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self {
            profile,
            by_self: OnceCell::new(),
            by_total: OnceCell::new(),
            callers: OnceCell::new(),
            files: OnceCell::new(),
            max_self: OnceCell::new(),
        }
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn frame(&self, id: u64) -> Option<&'a Frame> {
        self.profile.frames.get(id)
    }

    /// All frames, heaviest first; ties keep frame-table order
    pub fn sorted_frames(&self, key: SortKey) -> Vec<&'a Frame> {
        let frames = self.profile.frames.as_slice();
        let cell = match key {
            SortKey::SelfSamples => &self.by_self,
            SortKey::TotalSamples => &self.by_total,
        };

        let order = cell.get_or_init(|| {
            let mut order: Vec<usize> = (0..frames.len()).collect();
            match key {
                SortKey::SelfSamples => order.sort_by_key(|&i| Reverse(frames[i].self_samples)),
                SortKey::TotalSamples => order.sort_by_key(|&i| Reverse(frames[i].total_samples)),
            }
            order
        });

        order.iter().map(|&i| &frames[i]).collect()
    }

    /// Frames whose edges target `id`, with the edge weight.
    ///
    /// The first call indexes every edge in the profile; later calls are
    /// lookups.
    pub fn callers_of(&self, id: u64) -> &[CallEdge<'a>] {
        let index = self.callers.get_or_init(|| {
            let mut index: HashMap<u64, Vec<CallEdge<'a>>> = HashMap::new();
            for caller in &self.profile.frames {
                let Some(edges) = &caller.edges else {
                    continue;
                };
                for (&callee, &weight) in edges {
                    index.entry(callee).or_default().push(CallEdge {
                        id: caller.id,
                        name: &caller.name,
                        weight,
                    });
                }
            }
            index
        });

        index.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Callees of `id` present in the frame table, heaviest edge first
    pub fn callees_of(&self, id: u64) -> Vec<CallEdge<'a>> {
        let Some(edges) = self.frame(id).and_then(|f| f.edges.as_ref()) else {
            return Vec::new();
        };

        let mut callees: Vec<CallEdge<'a>> = edges
            .iter()
            .filter_map(|(&callee, &weight)| {
                self.frame(callee).map(|frame| CallEdge {
                    id: callee,
                    name: &frame.name,
                    weight,
                })
            })
            .collect();
        callees.sort_by_key(|edge| Reverse(edge.weight));
        callees
    }

    /// Frames nobody calls, in self-weight order
    pub fn root_frames(&self) -> Vec<&'a Frame> {
        self.sorted_frames(SortKey::SelfSamples)
            .into_iter()
            .filter(|frame| self.callers_of(frame.id).is_empty())
            .collect()
    }

    /// Frames whose name satisfies the predicate, in self-weight order
    pub fn frames_matching<F>(&self, matches: F) -> Vec<&'a Frame>
    where
        F: Fn(&str) -> bool,
    {
        self.sorted_frames(SortKey::SelfSamples)
            .into_iter()
            .filter(|frame| matches(&frame.name))
            .collect()
    }

    /// Line weights grouped by file, summed across frames sharing a file
    pub fn file_aggregation(&self) -> &FileAggregation<'a> {
        self.files.get_or_init(|| {
            let mut files: FileAggregation<'a> = BTreeMap::new();
            for frame in &self.profile.frames {
                let Some(lines) = &frame.lines else {
                    continue;
                };
                if frame.file.is_empty() {
                    continue;
                }
                let file = files.entry(frame.file.as_str()).or_default();
                for (&line, &weight) in lines {
                    let combined = match file.get(&line) {
                        Some(existing) => existing.combine(weight),
                        None => weight,
                    };
                    file.insert(line, combined);
                }
            }
            files
        })
    }

    /// Per-file `(total, self)` sums, heaviest self first
    pub fn file_totals(&self) -> Vec<(&'a str, u64, u64)> {
        let mut totals: Vec<(&'a str, u64, u64)> = self
            .file_aggregation()
            .iter()
            .map(|(&file, lines)| {
                let sum = lines
                    .values()
                    .fold(LineWeight::Pair(0, 0), |acc, &weight| acc.combine(weight));
                (file, sum.total_samples(), sum.self_samples())
            })
            .collect();
        totals.sort_by_key(|&(_, _, own)| Reverse(own));
        totals
    }

    /// Largest self weight of any frame, 0 for an empty profile
    pub fn max_self_samples(&self) -> u64 {
        *self.max_self.get_or_init(|| {
            self.profile
                .frames
                .iter()
                .map(|f| f.self_samples)
                .max()
                .unwrap_or(0)
        })
    }
}
