//! Heuristic thresholds.

use crate::error::{Error, Result};

/// Default vertical distance below which fragments share a line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 2.0;
/// Default left-margin limit for heading candidates.
pub const DEFAULT_LEFT_MARGIN: f32 = 100.0;
/// Default word-count cutoff; headings have strictly fewer words.
pub const DEFAULT_MAX_WORDS: usize = 15;
/// Default number of font sizes that get their own level.
pub const DEFAULT_SIZE_LEVELS: usize = 3;
/// Body size assumed for documents without fragments.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;
/// Title used when page 1 has no heading.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Thresholds for the heading pipeline.
///
/// Real documents vary, so every constant the heuristic depends on lives here
/// rather than inline in the stages.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicConfig {
    /// Fragments whose baselines differ by less than this merge into one line
    pub line_tolerance: f32,

    /// Lines must start left of this x coordinate to be headings
    pub left_margin: f32,

    /// Lines must have fewer words than this to be headings
    pub max_words: usize,

    /// How many of the largest heading sizes map to distinct levels (1-3)
    pub size_levels: usize,

    /// Median used when a document has no visible glyphs
    pub default_body_size: f32,

    /// Title when no page-1 heading exists
    pub untitled: String,
}

impl HeuristicConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line merge tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the left-margin limit.
    pub fn with_left_margin(mut self, margin: f32) -> Self {
        self.left_margin = margin;
        self
    }

    /// Set the word-count cutoff.
    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_words = words;
        self
    }

    /// Set how many sizes get distinct levels.
    pub fn with_size_levels(mut self, levels: usize) -> Self {
        self.size_levels = levels;
        self
    }

    /// Set the fallback title.
    pub fn with_untitled(mut self, title: impl Into<String>) -> Self {
        self.untitled = title.into();
        self
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.line_tolerance.is_finite() && self.line_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "line tolerance must be positive, got {}",
                self.line_tolerance
            )));
        }
        if !self.left_margin.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "left margin must be finite, got {}",
                self.left_margin
            )));
        }
        if self.max_words == 0 {
            return Err(Error::InvalidConfig(
                "max words must be at least 1".to_string(),
            ));
        }
        if !(1..=3).contains(&self.size_levels) {
            return Err(Error::InvalidConfig(format!(
                "size levels must be between 1 and 3, got {}",
                self.size_levels
            )));
        }
        if !(self.default_body_size.is_finite() && self.default_body_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "default body size must be positive, got {}",
                self.default_body_size
            )));
        }
        Ok(())
    }
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            left_margin: DEFAULT_LEFT_MARGIN,
            max_words: DEFAULT_MAX_WORDS,
            size_levels: DEFAULT_SIZE_LEVELS,
            default_body_size: DEFAULT_BODY_SIZE,
            untitled: UNKNOWN_TITLE.to_string(),
        }
    }
}
