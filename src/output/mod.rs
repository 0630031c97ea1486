//! Report renderers and file writers.
//!
//! Renderers turn a profile (or a view over it) into a `String`; writers put
//! strings and dumps on disk:
//! - JSON dumps (pretty and compact)
//! - SVG flamegraphs
//! - Text, Graphviz, Callgrind and stack-collapse reports

pub mod callgrind;
pub mod graphviz;
pub mod json;
pub mod stackcollapse;
pub mod svg;
pub mod text;

use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// Re-export main functions
pub use callgrind::render_callgrind;
pub use graphviz::{render_graphviz, GraphvizOptions};
pub use json::{dump_to_string, read_dump, write_dump, write_dump_compact};
pub use stackcollapse::render_stackcollapse;
pub use svg::write_svg;
pub use text::{render_files, render_method, render_text, TextReportOptions};

/// Validate that an output path is writable
///
/// **Public** - shared by every writer
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate the path and create its parent directories
pub(crate) fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

/// Write a rendered report to a file
pub fn write_text(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    let mut writer = create_output_file(output_path)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    debug!("Wrote {} bytes to {}", content.len(), output_path.display());
    Ok(())
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0
pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
