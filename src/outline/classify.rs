//! Heading classification.

use regex::Regex;

use crate::model::Line;

use super::config::HeuristicConfig;

/// Leading section numbers such as `2.`, `2.1 ` or `4.2.1 `.
#[derive(Debug, Clone)]
pub struct NumberingPattern {
    regex: Regex,
}

impl NumberingPattern {
    /// Compile the pattern.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(r"^(\d+(?:\.\d+)*)\.?\s").expect("numbering pattern is valid"),
        }
    }

    /// Whether the text starts with a section number followed by whitespace.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of dot-separated components in the leading section number.
    pub fn depth(&self, text: &str) -> Option<usize> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|prefix| prefix.as_str().split('.').count())
    }
}

impl Default for NumberingPattern {
    fn default() -> Self {
        Self::new()
    }
}

/// Individual heading signals for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    /// Line lies inside a table
    pub in_table: bool,
    /// Fewer words than the cutoff
    pub short: bool,
    /// Starts left of the margin
    pub left_aligned: bool,
    /// Starts with a section number
    pub numbered: bool,
    /// Larger than the body median
    pub large: bool,
    /// Bold font
    pub bold: bool,
}

impl Signals {
    /// Short, left-aligned, outside tables, and at least one of numbered,
    /// large or bold.
    pub fn is_heading(&self) -> bool {
        !self.in_table && self.short && self.left_aligned && self.has_heading_signal()
    }

    /// Whether any of the three independent heading signals fired.
    pub fn has_heading_signal(&self) -> bool {
        self.numbered || self.large || self.bold
    }
}

/// Stateless per-line heading test against document statistics.
#[derive(Debug, Clone)]
pub struct HeadingClassifier<'a> {
    numbering: &'a NumberingPattern,
    median_size: f32,
    max_words: usize,
    left_margin: f32,
}

impl<'a> HeadingClassifier<'a> {
    /// Create a classifier for a document whose body median is `median_size`.
    pub fn new(config: &HeuristicConfig, numbering: &'a NumberingPattern, median_size: f32) -> Self {
        Self {
            numbering,
            median_size,
            max_words: config.max_words,
            left_margin: config.left_margin,
        }
    }

    /// Evaluate every signal for a line.
    pub fn signals(&self, line: &Line) -> Signals {
        Signals {
            in_table: line.in_table,
            short: line.word_count() < self.max_words,
            left_aligned: line.x0 < self.left_margin,
            numbered: self.numbering.matches(&line.text),
            large: line.size > self.median_size,
            bold: line.bold,
        }
    }

    /// Whether a line is a heading.
    pub fn is_heading(&self, line: &Line) -> bool {
        self.signals(line).is_heading()
    }

    /// Keep only heading lines, in their original order.
    pub fn classify(&self, lines: &[Line]) -> Vec<Line> {
        let headings: Vec<Line> = lines
            .iter()
            .filter(|line| self.is_heading(line))
            .cloned()
            .collect();

        log::debug!(
            "Classified {} of {} lines as headings (median size {:.2})",
            headings.len(),
            lines.len(),
            self.median_size
        );

        headings
    }
}
