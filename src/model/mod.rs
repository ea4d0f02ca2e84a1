//! Data model shared by the extractor, the heading pipeline and the emitter.
//!
//! Fragments and table regions come out of the extractor; lines and headings
//! are derived by the pipeline; [`OutlineDocument`] is what gets written.

mod fragment;
mod line;
mod outline;

pub use fragment::{ExtractedDocument, Fragment, PageContent, TableRegion};
pub use line::Line;
pub use outline::{Heading, HeadingLevel, OutlineDocument, OutlineEntry};
