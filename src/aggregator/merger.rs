//! Multi-dump merging.
//!
//! Merging runs the canonicalizer over every input's frame table, rewrites
//! each input's raw stacks to canonical ids, concatenates them, and collapses
//! identical stacks. Weight is conserved: sample counters, frame counts and
//! raw occurrence counts of the result are the sums over the inputs.

use super::canonicalize::{rewrite_stacks, Canonicalizer, EdgePolicy};
use crate::parser::schema::{Profile, RawStack};
use crate::utils::error::MergeError;
use log::{debug, info};
use std::collections::HashMap;

/// Merge behaviour knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub edge_policy: EdgePolicy,

    /// Collapse identical raw stacks after merging
    pub dedup: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Preserve,
            dedup: true,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Merge profiles into one canonical profile
///
/// **Public** - main entry point for merging
///
/// # Errors
/// * `MergeError::NoProfiles` - empty input
/// * `MergeError::IncompatibleProfiles` - versions or modes differ
pub fn merge_profiles(profiles: &[Profile], options: &MergeOptions) -> Result<Profile, MergeError> {
    check_compatibility(profiles)?;
    let first = &profiles[0];

    info!("Merging {} profiles ({})", profiles.len(), first.modeline());

    let mut canonicalizer = Canonicalizer::new(options.edge_policy);
    let mut raw: Option<Vec<RawStack>> = None;
    let mut deltas: Option<Vec<u64>> = None;

    for profile in profiles {
        let renames = canonicalizer.absorb(&profile.frames);

        if let Some(stacks) = &profile.raw {
            raw.get_or_insert_with(Vec::new)
                .extend(rewrite_stacks(stacks, &renames));
        }

        if let Some(profile_deltas) = &profile.raw_timestamp_deltas {
            deltas
                .get_or_insert_with(Vec::new)
                .extend_from_slice(profile_deltas);
        }
    }

    let raw = match raw {
        Some(stacks) if options.dedup => {
            let deduped = dedup_raw_stacks(&stacks);
            debug!("Deduplicated {} raw stacks into {}", stacks.len(), deduped.len());
            Some(deduped)
        }
        other => other,
    };

    let frames = canonicalizer.finish();
    info!("Merged profile has {} frames", frames.len());

    Ok(Profile {
        version: first.version,
        mode: first.mode,
        interval: first.interval,
        samples: profiles.iter().map(|p| p.samples).sum(),
        gc_samples: profiles.iter().map(|p| p.gc_samples).sum(),
        missed_samples: profiles.iter().map(|p| p.missed_samples).sum(),
        frames,
        raw,
        raw_timestamp_deltas: deltas,
    })
}

/// Merge two profiles' frame tables only.
///
/// Edges are renamed into canonical id space and summed, line weights are
/// combined. The raw corpus is not carried over.
pub fn merge_frame_tables(left: &Profile, right: &Profile) -> Result<Profile, MergeError> {
    let options = MergeOptions::new().with_edge_policy(EdgePolicy::Rename);
    let pair = [strip_raw(left), strip_raw(right)];
    merge_profiles(&pair, &options)
}

fn strip_raw(profile: &Profile) -> Profile {
    Profile {
        raw: None,
        raw_timestamp_deltas: None,
        ..profile.clone()
    }
}

/// Collapse raw stacks with identical frame sequences, summing their counts.
///
/// Keyed on the full id sequence (hash plus exact equality), so stacks that
/// differ in any position stay separate. Output keeps first-seen order.
pub fn dedup_raw_stacks(stacks: &[RawStack]) -> Vec<RawStack> {
    let mut slots: HashMap<&[u64], usize> = HashMap::with_capacity(stacks.len());
    let mut merged: Vec<RawStack> = Vec::with_capacity(stacks.len());

    for stack in stacks {
        match slots.get(stack.frames.as_slice()) {
            Some(&slot) => merged[slot].count += stack.count,
            None => {
                slots.insert(stack.frames.as_slice(), merged.len());
                merged.push(stack.clone());
            }
        }
    }

    merged
}

/// Ensure all profiles share version and mode
///
/// **Private** - precondition of every merge
fn check_compatibility(profiles: &[Profile]) -> Result<(), MergeError> {
    let first = profiles.first().ok_or(MergeError::NoProfiles)?;

    for other in &profiles[1..] {
        if other.version != first.version {
            return Err(MergeError::IncompatibleProfiles(format!(
                "cannot combine v{} with v{}",
                first.version, other.version
            )));
        }
        if other.mode != first.mode {
            return Err(MergeError::IncompatibleProfiles(format!(
                "cannot combine {} with {}",
                first.mode, other.mode
            )));
        }
    }

    Ok(())
}
