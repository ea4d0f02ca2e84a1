//! Heading outline pipeline.
//!
//! Turns extractor output into an [`OutlineDocument`]:
//!
//! 1. [`mask`]: flag fragments inside table regions
//! 2. [`lines`]: reading order, then merge fragments into visual lines
//! 3. [`stats`]: body-size median and heading size ranking
//! 4. [`classify`]: keep short, left-aligned lines with a heading signal
//! 5. [`level`]: H1-H3 from section numbers or size rank
//! 6. [`title`]: largest heading on page 1
//!
//! Every stage takes a collection and returns a new one, so one pipeline can
//! serve many documents from many threads.

pub mod classify;
pub mod config;
pub mod level;
pub mod lines;
pub mod mask;
pub mod stats;
pub mod title;

pub use classify::{HeadingClassifier, NumberingPattern, Signals};
pub use config::HeuristicConfig;
pub use level::{LevelAssigner, LevelSource};
pub use stats::HeadingSizes;

use crate::error::Result;
use crate::model::{ExtractedDocument, Heading, HeadingLevel, Line, OutlineDocument};

/// One line with the evidence the pipeline collected for it.
#[derive(Debug, Clone)]
pub struct LineReport {
    /// The grouped line
    pub line: Line,
    /// Heading signals
    pub signals: Signals,
    /// Assigned level, for accepted headings
    pub level: Option<(HeadingLevel, LevelSource)>,
}

/// Full result of running the pipeline on one document.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Fragments seen, across all pages
    pub fragment_count: usize,
    /// Body-text baseline
    pub median_size: f32,
    /// Every line, in reading order
    pub lines: Vec<LineReport>,
    /// Distinct heading sizes, largest first
    pub heading_sizes: Vec<f32>,
    /// Accepted headings, in reading order
    pub headings: Vec<Heading>,
    /// Selected title
    pub title: String,
}

impl Analysis {
    /// Drop the diagnostics and keep the outline.
    pub fn into_outline(self) -> OutlineDocument {
        OutlineDocument::new(self.title, &self.headings)
    }
}

/// Heading pipeline bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct OutlinePipeline {
    config: HeuristicConfig,
    numbering: NumberingPattern,
}

impl OutlinePipeline {
    /// Create a pipeline, rejecting invalid thresholds.
    pub fn new(config: HeuristicConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            numbering: NumberingPattern::new(),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Build the outline for one document.
    ///
    /// Returns `None` for a document without fragments; nothing should be
    /// written for it.
    pub fn run(&self, doc: &ExtractedDocument) -> Option<OutlineDocument> {
        self.analyze(doc).map(Analysis::into_outline)
    }

    /// Run every stage and keep the intermediate evidence.
    pub fn analyze(&self, doc: &ExtractedDocument) -> Option<Analysis> {
        let fragments = lines::reading_order(mask::apply_table_mask(&doc.pages));
        if fragments.is_empty() {
            log::debug!("No fragments, skipping outline");
            return None;
        }

        let median_size = stats::median_font_size(&fragments, self.config.default_body_size);
        let all_lines = lines::group_into_lines(&fragments, self.config.line_tolerance);

        let classifier = HeadingClassifier::new(&self.config, &self.numbering, median_size);
        let accepted = classifier.classify(&all_lines);

        let assigner = LevelAssigner::new(&self.numbering, &accepted, self.config.size_levels);
        let heading_sizes = assigner.sizes().sizes();

        let reports = all_lines
            .into_iter()
            .map(|line| {
                let signals = classifier.signals(&line);
                let level = signals.is_heading().then(|| assigner.level_of(&line));
                LineReport {
                    line,
                    signals,
                    level,
                }
            })
            .collect();

        let headings = assigner.assign(accepted);
        let title = title::title_or(&headings, &self.config.untitled);

        log::debug!(
            "Outline: {} headings, title {:?}, median size {:.2}",
            headings.len(),
            title,
            median_size
        );

        Some(Analysis {
            fragment_count: fragments.len(),
            median_size,
            lines: reports,
            heading_sizes,
            headings,
            title,
        })
    }
}

/// Build an outline with a one-off pipeline.
///
/// ```
/// use pdf_outline::model::{ExtractedDocument, Fragment, PageContent};
/// use pdf_outline::outline::{build_outline, HeuristicConfig};
///
/// let mut page = PageContent::new(1);
/// page.fragments.push(Fragment::new("1. Introduction", 16.0, 50.0, 80.0, 1).bold(true));
/// page.fragments.push(Fragment::new("Body text follows here.", 11.0, 50.0, 110.0, 1));
/// page.fragments.push(Fragment::new("More body text.", 11.0, 50.0, 125.0, 1));
/// let mut doc = ExtractedDocument::new();
/// doc.add_page(page);
///
/// let outline = build_outline(&doc, HeuristicConfig::default()).unwrap().unwrap();
/// assert_eq!(outline.title, "1. Introduction");
/// assert_eq!(outline.outline.len(), 1);
/// ```
pub fn build_outline(
    doc: &ExtractedDocument,
    config: HeuristicConfig,
) -> Result<Option<OutlineDocument>> {
    Ok(OutlinePipeline::new(config)?.run(doc))
}
