//! Extraction options.

use super::table_detector::TableDetectorConfig;

/// Options for turning a PDF into fragments.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// What to do when one page cannot be decoded
    pub error_mode: ErrorMode,

    /// Whether to run table detection for the exclusion mask
    pub detect_tables: bool,

    /// Table detector thresholds
    pub table_config: TableDetectorConfig,

    /// Only read the first N pages (None = all)
    pub max_pages: Option<u32>,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip undecodable pages instead of failing the document.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Set table detector thresholds.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Limit extraction to the first `pages` pages.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Whether page `number` (1-based) should be read.
    pub fn includes_page(&self, number: u32) -> bool {
        self.max_pages.map_or(true, |max| number <= max)
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            detect_tables: true,
            table_config: TableDetectorConfig::default(),
            max_pages: None,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on the first bad page
    #[default]
    Strict,
    /// Log and skip bad pages
    Lenient,
}
