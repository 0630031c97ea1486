//! Build collapsed stack format from a profile's raw corpus.
//!
//! Collapsed stacks are the input format for flamegraph tooling.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "main;run;Array#each 1000"
//! This means: main called run which called Array#each, seen in 1000 samples.

use crate::parser::schema::Profile;
use crate::utils::error::RenderError;
use log::debug;

/// A single collapsed stack entry
///
/// **Public** - used by the stackcollapse renderer and SVG generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated frame names
    pub stack: String,

    /// Weight (samples that produced this stack)
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as one `stack weight` line
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a profile's raw corpus
///
/// **Public** - main entry point for stack building
///
/// One entry per raw record, in corpus order. Frames missing from the frame
/// table are named by their id.
///
/// # Errors
/// * `RenderError::MissingRawSamples` - the profile has no raw corpus
pub fn build_collapsed_stacks(profile: &Profile) -> Result<Vec<CollapsedStack>, RenderError> {
    let raw = profile.raw_samples()?;
    debug!("Building collapsed stacks from {} raw records", raw.len());

    let stacks = raw
        .iter()
        .map(|record| {
            let names: Vec<String> = record
                .frames
                .iter()
                .map(|&id| match profile.frames.get(id) {
                    Some(frame) => frame.name.clone(),
                    None => id.to_string(),
                })
                .collect();
            CollapsedStack::new(names.join(";"), record.count)
        })
        .collect();

    Ok(stacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Frame, Mode, RawStack};

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;execute;storage_read".to_string(), 1000);
        assert_eq!(stack.to_line(), "main;execute;storage_read 1000");
    }

    #[test]
    fn test_build_collapsed_stacks() {
        let mut profile = Profile::new(1.2, Mode::Wall, 1000);
        profile.frames.insert(Frame::new(1, "main", "a.rb", Some(1)));
        profile.frames.insert(Frame::new(2, "work", "a.rb", Some(4)));
        profile.raw = Some(vec![
            RawStack::new(vec![1, 2], 7),
            RawStack::new(vec![1], 2),
        ]);

        let stacks = build_collapsed_stacks(&profile).unwrap();
        let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
        assert_eq!(lines, vec!["main;work 7", "main 2"]);
    }

    #[test]
    fn test_build_collapsed_stacks_requires_raw() {
        let profile = Profile::new(1.2, Mode::Wall, 1000);
        assert!(matches!(
            build_collapsed_stacks(&profile),
            Err(RenderError::MissingRawSamples)
        ));
    }
}
