//! Rectangle layout for the browser flame-graph viewer.
//!
//! Each depth `y` is scanned left to right over the ordered stacks. Adjacent
//! stacks carrying the same frame at `y` coalesce into one rectangle; a stack
//! shorter than `y` breaks the run and still advances `x` by its weight.

use super::tree::{ordered_stacks, StackOrder};
use crate::parser::schema::Profile;
use crate::utils::error::RenderError;
use serde::Serialize;

/// One rectangle of the flame graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlameRow {
    pub x: u64,
    pub y: usize,
    pub width: u64,
    pub frame_id: u64,
    pub frame: String,
    pub file: String,
}

/// Lay out flame-graph rectangles for a profile's raw corpus.
///
/// With `skip_common`, the last rectangle of a depth is dropped when it spans
/// the whole corpus width.
///
/// # Errors
/// * `RenderError::MissingRawSamples` - the profile has no raw corpus
pub fn flamegraph_rows(
    profile: &Profile,
    order: StackOrder,
    skip_common: bool,
) -> Result<Vec<FlameRow>, RenderError> {
    let raw = profile.raw_samples()?;
    let stacks = ordered_stacks(raw, order);

    let max_x: u64 = stacks.iter().map(|s| s.count).sum();
    let max_y = stacks.iter().map(|s| s.frames.len()).max().unwrap_or(0);

    let mut rows = Vec::new();
    for y in 0..max_y {
        let mut current: Option<u64> = None;
        let mut row_width = 0;
        let mut x = 0;

        for stack in &stacks {
            let weight = stack.count;
            let cell = stack.frames.get(y).copied();

            match (cell, current) {
                (None, prev) => {
                    if let Some(id) = prev {
                        rows.push(make_row(profile, x - row_width, y, row_width, id));
                    }
                    current = None;
                }
                (Some(id), Some(prev)) if id == prev => row_width += weight,
                (Some(id), prev) => {
                    if let Some(prev) = prev {
                        rows.push(make_row(profile, x - row_width, y, row_width, prev));
                    }
                    current = Some(id);
                    row_width = weight;
                }
            }
            x += weight;
        }

        if let Some(id) = current {
            if skip_common && row_width == max_x {
                continue;
            }
            rows.push(make_row(profile, x - row_width, y, row_width, id));
        }
    }

    Ok(rows)
}

/// Render rows as the `flamegraph([...])` script payload read by the viewer
pub fn render_flamegraph_script(rows: &[FlameRow]) -> Result<String, serde_json::Error> {
    let mut output = String::from("flamegraph([\n");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(&serde_json::to_string(row)?);
        output.push('\n');
    }
    output.push_str("])\n");
    Ok(output)
}

fn make_row(profile: &Profile, x: u64, y: usize, width: u64, id: u64) -> FlameRow {
    let (frame, file) = match profile.frames.get(id) {
        Some(frame) => (frame.name.clone(), frame.file.clone()),
        None => (id.to_string(), String::new()),
    };
    FlameRow {
        x,
        y,
        width,
        frame_id: id,
        frame,
        file,
    }
}
