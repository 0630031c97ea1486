//! Frame identity canonicalization across independently sampled dumps.
//!
//! Frame ids are only meaningful inside the dump that produced them. Frames
//! are matched across dumps by content, `(name, file, line)`: the first frame
//! seen for an identity becomes canonical and later frames with the same
//! identity fold their sample counts into it.
//!
//! # Example
//! ```ignore
//! let mut canon = Canonicalizer::new(EdgePolicy::Preserve);
//! let renames = canon.absorb(&dump.frames);
//! let stacks = rewrite_stacks(dump.raw_samples()?, &renames);
//! let frames = canon.finish();
//! ```

use crate::parser::schema::{Frame, FrameTable, RawStack};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Content identity of a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameIdentity {
    pub name: String,
    pub file: String,
    pub line: Option<u64>,
}

impl FrameIdentity {
    pub fn of(frame: &Frame) -> Self {
        Self {
            name: frame.name.clone(),
            file: frame.file.clone(),
            line: frame.line,
        }
    }
}

/// What happens to per-frame `edges` (and `lines`) during canonicalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EdgePolicy {
    /// Keep the canonical frame's edges and lines exactly as loaded; edge
    /// targets stay dump-local and duplicates' edges are dropped
    #[default]
    Preserve,

    /// Rewrite edge targets to canonical ids and fold duplicates' edges and
    /// line weights into the canonical frame
    Rename,
}

/// Dump-local id -> canonical id, for ids that changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    renames: HashMap<u64, u64>,
}

impl RenameMap {
    /// Canonical id for a dump-local id; unchanged ids map to themselves
    pub fn resolve(&self, id: u64) -> u64 {
        self.renames.get(&id).copied().unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    fn insert(&mut self, from: u64, to: u64) {
        if from != to {
            self.renames.insert(from, to);
        }
    }
}

/// Accumulates frame tables into one canonical table
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    policy: EdgePolicy,
    by_identity: HashMap<FrameIdentity, u64>,
    table: FrameTable,
    next_fresh_id: u64,
}

impl Canonicalizer {
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Fold one dump's frame table into the canonical table.
    ///
    /// Returns the renames that must be applied to that dump's raw stacks.
    /// A new identity keeps its dump-local id unless an earlier dump already
    /// claimed it, in which case it gets a fresh id above every id assigned
    /// so far.
    pub fn absorb(&mut self, frames: &FrameTable) -> RenameMap {
        let mut renames = RenameMap::default();
        let mut merged = 0usize;

        for frame in frames {
            let identity = FrameIdentity::of(frame);

            if let Some(&canonical_id) = self.by_identity.get(&identity) {
                renames.insert(frame.id, canonical_id);
                if let Some(canonical) = self.table.get_mut(canonical_id) {
                    canonical.self_samples += frame.self_samples;
                    canonical.total_samples += frame.total_samples;
                }
                merged += 1;
                continue;
            }

            let canonical_id = if self.table.contains(frame.id) {
                self.fresh_id()
            } else {
                frame.id
            };
            renames.insert(frame.id, canonical_id);
            self.next_fresh_id = self.next_fresh_id.max(canonical_id.saturating_add(1));
            self.by_identity.insert(identity, canonical_id);

            let mut canonical = frame.clone();
            canonical.id = canonical_id;
            if self.policy == EdgePolicy::Rename {
                canonical.edges = None;
                canonical.lines = None;
            }
            self.table.insert(canonical);
        }

        if self.policy == EdgePolicy::Rename {
            self.fold_edges_and_lines(frames, &renames);
        }

        debug!(
            "Absorbed {} frames ({} merged into existing identities, {} renamed)",
            frames.len(),
            merged,
            renames.len()
        );

        renames
    }

    /// Id above every assigned id; once that range is exhausted at
    /// `u64::MAX`, the lowest id not yet in the table
    fn fresh_id(&self) -> u64 {
        if !self.table.contains(self.next_fresh_id) {
            return self.next_fresh_id;
        }
        // The table is finite, so some id in 0..=len is free
        (0..=u64::MAX)
            .find(|id| !self.table.contains(*id))
            .unwrap_or(u64::MAX)
    }

    /// Second pass for `EdgePolicy::Rename`; needs the dump's full rename map
    fn fold_edges_and_lines(&mut self, frames: &FrameTable, renames: &RenameMap) {
        for frame in frames {
            let Some(canonical) = self.table.get_mut(renames.resolve(frame.id)) else {
                continue;
            };

            if let Some(edges) = &frame.edges {
                let target = canonical.edges.get_or_insert_with(BTreeMap::new);
                for (&callee, &weight) in edges {
                    *target.entry(renames.resolve(callee)).or_insert(0) += weight;
                }
            }

            if let Some(lines) = &frame.lines {
                let target = canonical.lines.get_or_insert_with(BTreeMap::new);
                for (&line, &weight) in lines {
                    let combined = match target.get(&line) {
                        Some(existing) => existing.combine(weight),
                        None => weight,
                    };
                    target.insert(line, combined);
                }
            }
        }
    }

    /// Consume the canonicalizer, returning the canonical frame table
    pub fn finish(self) -> FrameTable {
        self.table
    }
}

/// Rewrite raw stack frame ids through a dump's rename map
pub fn rewrite_stacks(stacks: &[RawStack], renames: &RenameMap) -> Vec<RawStack> {
    stacks
        .iter()
        .map(|stack| {
            RawStack::new(
                stack.frames.iter().map(|&id| renames.resolve(id)).collect(),
                stack.count,
            )
        })
        .collect()
}
