//! SVG and d3 flamegraph generation.
//!
//! SVG output goes through inferno, fed with the collapsed stacks built from
//! the raw corpus. The d3 output serializes the reconstructed flame tree.

use super::tree::FlameNode;
use crate::aggregator::stack_builder::CollapsedStack;
use crate::utils::config::{DEFAULT_FLAMEGRAPH_TITLE, DEFAULT_FLAMEGRAPH_WIDTH};
use crate::utils::error::RenderError;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,

    /// Unit shown in tooltips, derived from the profile mode
    pub count_name: String,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_FLAMEGRAPH_TITLE.to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
            count_name: "samples".to_string(),
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_count_name(mut self, count_name: impl Into<String>) -> Self {
        self.count_name = count_name.into();
        self
    }
}

/// Generate an SVG flamegraph from collapsed stacks
///
/// **Public** - used by the report command's `svg` format
///
/// # Errors
/// * `RenderError::EmptyStacks` - nothing to draw
/// * `RenderError::Svg` - inferno rejected the input
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, RenderError> {
    if stacks.is_empty() {
        return Err(RenderError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph from {} stacks", stacks.len());

    let lines: Vec<String> = stacks
        .iter()
        .filter(|s| s.weight > 0)
        .map(CollapsedStack::to_line)
        .collect();
    if lines.is_empty() {
        return Err(RenderError::EmptyStacks);
    }

    let mut options = Options::default();
    options.title = config.title;
    options.image_width = Some(config.width);
    options.count_name = config.count_name;

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| RenderError::Svg(e.to_string()))?;

    let svg = String::from_utf8(svg).map_err(|e| RenderError::Svg(e.to_string()))?;
    info!("Flamegraph generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

/// Serialize a flame tree as the nested `{name, value, children}` JSON d3 reads
pub fn generate_d3_json(root: &FlameNode) -> Result<String, serde_json::Error> {
    debug!("Serializing flame tree of depth {}", root.depth());
    serde_json::to_string_pretty(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = FlamegraphConfig::new()
            .with_title("merged")
            .with_width(800)
            .with_count_name("cpu");
        assert_eq!(config.title, "merged");
        assert_eq!(config.width, 800);
        assert_eq!(config.count_name, "cpu");
    }

    #[test]
    fn test_empty_stacks_rejected() {
        assert!(matches!(
            generate_flamegraph(&[], None),
            Err(RenderError::EmptyStacks)
        ));

        let zero = vec![CollapsedStack::new("main".to_string(), 0)];
        assert!(matches!(
            generate_flamegraph(&zero, None),
            Err(RenderError::EmptyStacks)
        ));
    }

    #[test]
    fn test_generates_svg() {
        let stacks = vec![
            CollapsedStack::new("main;work".to_string(), 7),
            CollapsedStack::new("main".to_string(), 3),
        ];
        let config = FlamegraphConfig::new().with_title("unit");
        let svg = generate_flamegraph(&stacks, Some(&config)).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("unit"));
        assert!(svg.contains("work"));
    }

    #[test]
    fn test_d3_json_shape() {
        let root = FlameNode {
            label: "<root>".to_string(),
            weight: 3,
            children: vec![FlameNode {
                label: "main : a.rb:1".to_string(),
                weight: 3,
                children: vec![],
            }],
        };
        let json: serde_json::Value = serde_json::from_str(&generate_d3_json(&root).unwrap()).unwrap();

        assert_eq!(json["value"], 3);
        assert_eq!(json["children"][0]["name"], "main : a.rb:1");
        assert!(json["children"][0]["children"].as_array().unwrap().is_empty());
    }
}
