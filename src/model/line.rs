//! Visual text lines.

use serde::{Deserialize, Serialize};

/// Fragments merged by vertical proximity into one visual line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Concatenated, trimmed text
    pub text: String,
    /// Median font size over the line's glyphs
    pub size: f32,
    /// True if any fragment is bold
    pub bold: bool,
    /// Left edge (minimum fragment x0)
    pub x0: f32,
    /// 1-based page number
    pub page: u32,
    /// True if any fragment lies inside a table
    pub in_table: bool,
}

impl Line {
    /// Create a plain, non-bold line outside any table.
    pub fn new(text: impl Into<String>, size: f32, x0: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            x0,
            page,
            in_table: false,
        }
    }

    /// Mark the line bold.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Mark the line as lying in a table.
    pub fn in_table(mut self, in_table: bool) -> Self {
        self.in_table = in_table;
        self
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
