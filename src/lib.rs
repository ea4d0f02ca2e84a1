//! # pdf-outline
//!
//! Heading outline extraction for PDF documents.
//!
//! Reads the text of a PDF, works out which lines are headings from font
//! size, weight, position and section numbering, and produces a title plus a
//! flat list of `H1`–`H3` headings with their page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline_file, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     if let Some(outline) = extract_outline_file("report.pdf")? {
//!         let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!         println!("{}", json);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser`]: content streams to positioned text fragments and table boxes
//! - [`outline`]: fragments to lines, headings, levels and a title
//! - [`render`]: outline to JSON
//! - [`batch`]: directories of PDFs, optionally in parallel

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport, DocumentOutcome};
pub use error::{Error, Result};
pub use model::{
    ExtractedDocument, Fragment, Heading, HeadingLevel, Line, OutlineDocument, OutlineEntry,
    PageContent, TableRegion,
};
pub use outline::{build_outline, HeuristicConfig, OutlinePipeline};
pub use parser::{ErrorMode, ExtractOptions};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default settings.
///
/// Returns `Ok(None)` when the document has no text.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline_file;
///
/// let outline = extract_outline_file("report.pdf").unwrap();
/// if let Some(outline) = outline {
///     println!("{}: {} headings", outline.title, outline.len());
/// }
/// ```
pub fn extract_outline_file<P: AsRef<Path>>(path: P) -> Result<Option<OutlineDocument>> {
    extract_outline_file_with(path, &ExtractOptions::default(), HeuristicConfig::default())
}

/// Extract the outline of a PDF file with custom settings.
pub fn extract_outline_file_with<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
    config: HeuristicConfig,
) -> Result<Option<OutlineDocument>> {
    let pipeline = OutlinePipeline::new(config)?;
    let doc = parser::extract_file(path, options)?;
    Ok(pipeline.run(&doc))
}

/// Extract the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let outline = extract_outline_bytes(&data).unwrap();
/// ```
pub fn extract_outline_bytes(data: &[u8]) -> Result<Option<OutlineDocument>> {
    let pipeline = OutlinePipeline::new(HeuristicConfig::default())?;
    let doc = parser::extract_bytes(data, &ExtractOptions::default())?;
    Ok(pipeline.run(&doc))
}
