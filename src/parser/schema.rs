//! Profile data model and dump schema definitions.
//!
//! A `Profile` is one dump (or the result of merging several). Frame ids are
//! dump-local: two profiles can use the same id for unrelated frames, so any
//! cross-profile work goes through the canonicalizer first.
//!
//! `DumpFile` is the on-disk JSON layout; its `raw` field carries the flat
//! run-length corpus described in `aggregator::codec`.

use crate::utils::error::RenderError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Sampling mode of the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Wall,
    Cpu,
    Object,
    Custom,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Wall => "wall",
            Mode::Cpu => "cpu",
            Mode::Object => "object",
            Mode::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Weight recorded against one source line of a frame.
///
/// Version 1.0 dumps store a self-only scalar; later versions store a
/// `[total, self]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineWeight {
    Scalar(u64),
    Pair(u64, u64),
}

impl LineWeight {
    /// Add two line weights.
    ///
    /// Same shapes add component-wise; a scalar mixed with a pair only
    /// contributes to the pair's self component.
    pub fn combine(self, other: LineWeight) -> LineWeight {
        match (self, other) {
            (LineWeight::Scalar(a), LineWeight::Scalar(b)) => LineWeight::Scalar(a + b),
            (LineWeight::Pair(total, own), LineWeight::Scalar(extra))
            | (LineWeight::Scalar(extra), LineWeight::Pair(total, own)) => {
                LineWeight::Pair(total, own + extra)
            }
            (LineWeight::Pair(t1, s1), LineWeight::Pair(t2, s2)) => LineWeight::Pair(t1 + t2, s1 + s2),
        }
    }

    /// Self component (the scalar itself for version 1.0 weights)
    pub fn self_samples(&self) -> u64 {
        match *self {
            LineWeight::Scalar(own) => own,
            LineWeight::Pair(_, own) => own,
        }
    }

    /// Total component (the scalar itself for version 1.0 weights)
    pub fn total_samples(&self) -> u64 {
        match *self {
            LineWeight::Scalar(total) => total,
            LineWeight::Pair(total, _) => total,
        }
    }
}

/// One static call site with its aggregated sample weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Dump-local id; carried as the map key in the dump format
    #[serde(skip)]
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub file: String,

    #[serde(default)]
    pub line: Option<u64>,

    /// Samples where this frame was executing
    #[serde(rename = "samples")]
    pub self_samples: u64,

    /// Self samples plus all descendant samples
    pub total_samples: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<BTreeMap<u64, LineWeight>>,

    /// Callee id -> call weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<BTreeMap<u64, u64>>,
}

impl Frame {
    pub fn new(id: u64, name: impl Into<String>, file: impl Into<String>, line: Option<u64>) -> Self {
        Self {
            id,
            name: name.into(),
            file: file.into(),
            line,
            self_samples: 0,
            total_samples: 0,
            lines: None,
            edges: None,
        }
    }

    pub fn with_samples(mut self, self_samples: u64, total_samples: u64) -> Self {
        self.self_samples = self_samples;
        self.total_samples = total_samples;
        self
    }

    pub fn with_edge(mut self, callee: u64, weight: u64) -> Self {
        *self.edges.get_or_insert_with(BTreeMap::new).entry(callee).or_insert(0) += weight;
        self
    }

    pub fn with_line(mut self, line: u64, weight: LineWeight) -> Self {
        let lines = self.lines.get_or_insert_with(BTreeMap::new);
        let merged = match lines.get(&line) {
            Some(existing) => existing.combine(weight),
            None => weight,
        };
        lines.insert(line, merged);
        self
    }

    /// `name : file:line`, the label used by flame trees
    pub fn descriptive_name(&self) -> String {
        let line = self.line.map(|l| l.to_string()).unwrap_or_default();
        format!("{} : {}:{}", self.name, self.file, line)
    }
}

/// Frames keyed by id, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameTable {
    frames: Vec<Frame>,
    index: HashMap<u64, usize>,
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a frame, replacing (in place) any frame with the same id
    pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
        match self.index.get(&frame.id) {
            Some(&pos) => Some(std::mem::replace(&mut self.frames[pos], frame)),
            None => {
                self.index.insert(frame.id, self.frames.len());
                self.frames.push(frame);
                None
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<&Frame> {
        self.index.get(&id).map(|&pos| &self.frames[pos])
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Frame> {
        match self.index.get(&id) {
            Some(&pos) => Some(&mut self.frames[pos]),
            None => None,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }
}

impl FromIterator<Frame> for FrameTable {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        let mut table = FrameTable::new();
        for frame in iter {
            table.insert(frame);
        }
        table
    }
}

impl<'a> IntoIterator for &'a FrameTable {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl Serialize for FrameTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.frames.len()))?;
        for frame in &self.frames {
            map.serialize_entry(&frame.id, frame)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FrameTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FrameTableVisitor;

        impl<'de> Visitor<'de> for FrameTableVisitor {
            type Value = FrameTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of frame id to frame")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = FrameTable::new();
                while let Some((id, mut frame)) = access.next_entry::<u64, Frame>()? {
                    frame.id = id;
                    table.insert(frame);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(FrameTableVisitor)
    }
}

/// One distinct call stack (root first, leaf last) and how often it was seen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawStack {
    pub frames: Vec<u64>,
    pub count: u64,
}

impl RawStack {
    pub fn new(frames: Vec<u64>, count: u64) -> Self {
        Self { frames, count }
    }
}

/// One dump or merge result
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub version: f64,
    pub mode: Mode,
    pub interval: u64,
    pub samples: u64,
    pub gc_samples: u64,
    pub missed_samples: u64,
    pub frames: FrameTable,

    /// Absent when the collector ran without raw stack retention
    pub raw: Option<Vec<RawStack>>,

    pub raw_timestamp_deltas: Option<Vec<u64>>,
}

impl Profile {
    pub fn new(version: f64, mode: Mode, interval: u64) -> Self {
        Self {
            version,
            mode,
            interval,
            samples: 0,
            gc_samples: 0,
            missed_samples: 0,
            frames: FrameTable::new(),
            raw: None,
            raw_timestamp_deltas: None,
        }
    }

    /// `mode(interval)`, e.g. `wall(1000)`
    pub fn modeline(&self) -> String {
        format!("{}({})", self.mode, self.interval)
    }

    /// Raw stacks, or `MissingRawSamples` when the dump has none
    pub fn raw_samples(&self) -> Result<&[RawStack], RenderError> {
        self.raw.as_deref().ok_or(RenderError::MissingRawSamples)
    }

    /// Sum of occurrence counts over the raw corpus
    pub fn raw_weight(&self) -> u64 {
        self.raw
            .as_ref()
            .map(|raw| raw.iter().map(|s| s.count).sum())
            .unwrap_or(0)
    }

    /// First raw-stack frame id that is missing from the frame table
    pub fn dangling_raw_reference(&self) -> Option<u64> {
        self.raw.as_ref().and_then(|raw| {
            raw.iter()
                .flat_map(|stack| stack.frames.iter().copied())
                .find(|id| !self.frames.contains(*id))
        })
    }
}

/// On-disk dump layout (stackprof JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpFile {
    pub version: f64,
    pub mode: Mode,
    pub interval: u64,

    #[serde(default)]
    pub samples: u64,

    #[serde(default)]
    pub gc_samples: u64,

    #[serde(default)]
    pub missed_samples: u64,

    #[serde(default)]
    pub frames: FrameTable,

    /// Flat `[len, ids.., count]*` corpus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_timestamp_deltas: Option<Vec<u64>>,
}
