//! Positioned text as it comes out of the extractor.

use serde::{Deserialize, Serialize};

/// The smallest positioned unit of text the extractor reports.
///
/// Coordinates are PDF points with the origin at the top-left corner of the
/// page, so `y0` grows downward and `(page, y0, x0)` ascending is reading
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text content
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font looks bold
    pub bold: bool,
    /// Left edge
    pub x0: f32,
    /// Baseline, measured from the top of the page
    pub y0: f32,
    /// Estimated advance width
    pub width: f32,
    /// 1-based page number
    pub page: u32,
    /// Whether the fragment falls inside a detected table
    pub in_table: bool,
}

impl Fragment {
    /// Create a fragment outside any table, with no width estimate.
    pub fn new(text: impl Into<String>, font_size: f32, x0: f32, y0: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold: false,
            x0,
            y0,
            width: 0.0,
            page,
            in_table: false,
        }
    }

    /// Mark the fragment bold.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the estimated width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Right edge, using the estimated width.
    pub fn x1(&self) -> f32 {
        self.x0 + self.width
    }

    /// Visible glyphs in the fragment. Font-size statistics weigh each
    /// fragment by this, so one show operation per glyph and one per line
    /// produce the same medians.
    pub fn glyph_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// A table bounding box on one page, in the same coordinate space as
/// [`Fragment`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// 1-based page number
    pub page: u32,
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl TableRegion {
    /// Create a region; edges are normalized so `x0 <= x1` and `y0 <= y1`.
    pub fn new(page: u32, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            page,
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    /// Whether the fragment's origin lies in this region on the same page.
    pub fn contains_fragment(&self, fragment: &Fragment) -> bool {
        self.page == fragment.page && self.contains(fragment.x0, fragment.y0)
    }
}

/// Everything the extractor reports for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// 1-based page number
    pub number: u32,
    /// Fragments in content-stream order
    pub fragments: Vec<Fragment>,
    /// Detected table regions
    pub tables: Vec<TableRegion>,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }
}

/// Extractor output for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Pages in document order
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: PageContent) {
        self.pages.push(page);
    }

    /// Total fragments across all pages.
    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }

    /// Total table regions across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }

    /// Whether no page produced any fragment.
    pub fn is_empty(&self) -> bool {
        self.fragment_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_normalizes_edges() {
        let region = TableRegion::new(1, 200.0, 300.0, 100.0, 250.0);
        assert_eq!(region.x0, 100.0);
        assert_eq!(region.x1, 200.0);
        assert_eq!(region.y0, 250.0);
        assert_eq!(region.y1, 300.0);
    }

    #[test]
    fn test_region_containment_is_inclusive() {
        let region = TableRegion::new(2, 50.0, 100.0, 300.0, 200.0);
        assert!(region.contains(50.0, 100.0));
        assert!(region.contains(300.0, 200.0));
        assert!(!region.contains(49.9, 150.0));

        let inside = Fragment::new("cell", 10.0, 60.0, 150.0, 2);
        let other_page = Fragment::new("cell", 10.0, 60.0, 150.0, 1);
        assert!(region.contains_fragment(&inside));
        assert!(!region.contains_fragment(&other_page));
    }

    #[test]
    fn test_glyph_count_skips_whitespace() {
        assert_eq!(Fragment::new(" first list item", 11.0, 0.0, 0.0, 1).glyph_count(), 13);
        assert_eq!(Fragment::new("•", 20.0, 0.0, 0.0, 1).glyph_count(), 1);
        assert_eq!(Fragment::new("  ", 11.0, 0.0, 0.0, 1).glyph_count(), 0);
    }

    #[test]
    fn test_document_counts() {
        let mut doc = ExtractedDocument::new();
        assert!(doc.is_empty());

        let mut page = PageContent::new(1);
        page.fragments.push(Fragment::new("A", 12.0, 10.0, 10.0, 1));
        page.tables.push(TableRegion::new(1, 0.0, 0.0, 1.0, 1.0));
        doc.add_page(page);
        doc.add_page(PageContent::new(2));

        assert_eq!(doc.fragment_count(), 1);
        assert_eq!(doc.table_count(), 1);
        assert!(!doc.is_empty());
    }
}
