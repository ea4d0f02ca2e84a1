//! Headings and the outline document they form.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Line;

/// Heading depth. Anything deeper than three collapses to `H3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a 1-based depth to a level, clamping to `H1..=H3`.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// 1-based depth.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level label, e.g. `"H2"`.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line accepted as a heading, with its assigned level.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// The source line
    pub line: Line,
    /// Assigned depth
    pub level: HeadingLevel,
}

impl Heading {
    /// Heading text.
    pub fn text(&self) -> &str {
        &self.line.text
    }

    /// Page the heading is on.
    pub fn page(&self) -> u32 {
        self.line.page
    }

    /// Font size of the heading line.
    pub fn size(&self) -> f32 {
        self.line.size
    }
}

/// One record of the serialized outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl From<&Heading> for OutlineEntry {
    fn from(heading: &Heading) -> Self {
        Self {
            level: heading.level,
            text: heading.line.text.clone(),
            page: heading.line.page,
        }
    }
}

/// The terminal artifact: one per input PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title
    pub title: String,
    /// Headings in document order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineDocument {
    /// Build from a title and headings, preserving heading order.
    pub fn new(title: impl Into<String>, headings: &[Heading]) -> Self {
        Self {
            title: title.into(),
            outline: headings.iter().map(OutlineEntry::from).collect(),
        }
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Count headings at one level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}
