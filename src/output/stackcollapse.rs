//! Stack-collapse output (`a;b;c weight` per raw record), the input format
//! of `flamegraph.pl` and inferno.

use crate::aggregator::stack_builder::{build_collapsed_stacks, CollapsedStack};
use crate::parser::schema::Profile;
use crate::utils::error::RenderError;

/// Render one collapsed line per raw record
///
/// # Errors
/// * `RenderError::MissingRawSamples` - the profile has no raw corpus
pub fn render_stackcollapse(profile: &Profile) -> Result<String, RenderError> {
    let stacks = build_collapsed_stacks(profile)?;
    let mut output = String::new();
    for line in stacks.iter().map(CollapsedStack::to_line) {
        output.push_str(&line);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Frame, Mode, RawStack};

    #[test]
    fn test_render_stackcollapse() {
        let mut profile = Profile::new(1.2, Mode::Wall, 1000);
        profile.frames.insert(Frame::new(1, "main", "a.rb", Some(1)));
        profile.frames.insert(Frame::new(2, "sleep", "a.rb", Some(2)));
        profile.raw = Some(vec![
            RawStack::new(vec![1, 2], 4),
            RawStack::new(vec![1], 1),
        ]);

        assert_eq!(render_stackcollapse(&profile).unwrap(), "main;sleep 4\nmain 1\n");
    }
}
