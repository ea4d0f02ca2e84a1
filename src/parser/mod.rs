//! PDF parsing module.
//!
//! Produces an [`ExtractedDocument`](crate::model::ExtractedDocument): per
//! page, the text fragments in stream order and the table regions found
//! among them.

pub mod backend;
mod extractor;
mod options;
mod table_detector;

pub use backend::{LopdfBackend, PdfBackend};
pub use extractor::{extract_bytes, extract_file, is_bold_font, FragmentExtractor};
pub use options::{ErrorMode, ExtractOptions};
pub use table_detector::{TableDetector, TableDetectorConfig};
