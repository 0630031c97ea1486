//! Flame tree reconstruction from raw stacks.
//!
//! Stacks are ordered (input order or lexicographic by id sequence), then
//! grouped recursively: at depth `d` the list splits into maximal contiguous
//! runs that either end at `d` (leaf weight of the current node) or share the
//! frame id at `d` (one child per run). A node's weight is its leaf weight
//! plus the weight of its children, so the root carries the whole corpus.

use crate::parser::schema::{FrameTable, Profile, RawStack};
use crate::utils::config::FLAME_ROOT_LABEL;
use crate::utils::error::RenderError;
use serde::Serialize;

/// Order in which stacks are laid out before grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StackOrder {
    /// Corpus order, so adjacent samples stay adjacent
    #[default]
    Timeline,
    /// Lexicographic by frame id sequence, merging all identical prefixes
    Alphabetical,
}

/// A weighted node of the reconstructed call tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlameNode {
    #[serde(rename = "name")]
    pub label: String,

    #[serde(rename = "value")]
    pub weight: u64,

    pub children: Vec<FlameNode>,
}

impl FlameNode {
    /// Weight of stacks that end exactly at this node
    pub fn self_weight(&self) -> u64 {
        self.weight - self.children.iter().map(|c| c.weight).sum::<u64>()
    }

    /// Number of levels below and including this node
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(FlameNode::depth).max().unwrap_or(0)
    }
}

/// Build the flame tree of a profile
///
/// # Errors
/// * `RenderError::MissingRawSamples` - the profile has no raw corpus
pub fn build_flame_tree(profile: &Profile, order: StackOrder) -> Result<FlameNode, RenderError> {
    let raw = profile.raw_samples()?;
    Ok(flame_tree_from_stacks(raw, &profile.frames, order))
}

/// Build a flame tree from stacks resolved against `frames`
pub fn flame_tree_from_stacks(stacks: &[RawStack], frames: &FrameTable, order: StackOrder) -> FlameNode {
    let ordered = ordered_stacks(stacks, order);
    build_node(FLAME_ROOT_LABEL.to_string(), &ordered, 0, frames)
}

/// Stacks in layout order; alphabetical sorting is stable
pub(crate) fn ordered_stacks(stacks: &[RawStack], order: StackOrder) -> Vec<&RawStack> {
    let mut ordered: Vec<&RawStack> = stacks.iter().collect();
    if order == StackOrder::Alphabetical {
        ordered.sort_by(|a, b| a.frames.cmp(&b.frames));
    }
    ordered
}

fn build_node(label: String, stacks: &[&RawStack], depth: usize, frames: &FrameTable) -> FlameNode {
    let mut weight = 0;
    let mut children = Vec::new();
    let mut start = 0;

    while start < stacks.len() {
        let key = stacks[start].frames.get(depth).copied();
        let end = start
            + stacks[start..]
                .iter()
                .take_while(|s| s.frames.get(depth).copied() == key)
                .count();
        let run = &stacks[start..end];

        match key {
            None => weight += run.iter().map(|s| s.count).sum::<u64>(),
            Some(id) => {
                let child = build_node(frame_label(frames, id), run, depth + 1, frames);
                weight += child.weight;
                children.push(child);
            }
        }

        start = end;
    }

    FlameNode {
        label,
        weight,
        children,
    }
}

fn frame_label(frames: &FrameTable, id: u64) -> String {
    match frames.get(id) {
        Some(frame) => frame.descriptive_name(),
        None => format!("<unknown frame {}>", id),
    }
}
