//! Fragment extraction from PDF content streams.
//!
//! Walks each page's content stream, tracking the text and graphics state,
//! and emits one [`Fragment`] per text-showing operation. Coordinates are
//! converted to a top-down frame (`y0` grows down the page) so that sorting
//! ascending by `(page, y0, x0)` is reading order.

use std::collections::HashMap;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{ExtractedDocument, Fragment, PageContent};

use super::backend::{ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
use super::options::{ErrorMode, ExtractOptions};
use super::table_detector::TableDetector;

/// Default font size before any `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Estimated glyph advance, in em.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// TJ adjustments larger than this (thousandths of an em) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Horizontal gap, in em, between two shows on a baseline that reads as a
/// word gap.
const SHOW_GAP_EM: f32 = 0.15;

/// Font name fragments that mark a bold face.
const BOLD_MARKERS: [&str; 3] = ["bold", "black", "heavy"];

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(op: &ContentOp) -> Self {
        Self {
            a: op.number(0, 1.0),
            b: op.number(1, 0.0),
            c: op.number(2, 0.0),
            d: op.number(3, 1.0),
            e: op.number(4, 0.0),
            f: op.number(5, 0.0),
        }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit y vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// The parts of the graphics state that `q`/`Q` save and restore.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    leading: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
        }
    }
}

/// End of the previous show on this page.
#[derive(Debug, Clone, Copy)]
struct LastShow {
    y0: f32,
    x_end: f32,
    last_char: char,
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Whether a gap before or after `c` should not become a space.
fn is_gap_neutral(c: char) -> bool {
    c.is_whitespace() || is_spaceless_script_char(c)
}

/// Whether a font name denotes a bold face.
pub fn is_bold_font(name: &str) -> bool {
    let lower = name.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Content stream interpreter for one page.
struct PageWalker<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page_id: PageId,
    page_number: u32,
    page_height: f32,
    fonts: HashMap<Vec<u8>, String>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    last: Option<LastShow>,
    fragments: Vec<Fragment>,
}

impl<'a, B: PdfBackend + ?Sized> PageWalker<'a, B> {
    fn walk(mut self, ops: &[ContentOp]) -> Vec<Fragment> {
        for op in ops {
            self.apply(op);
        }
        self.fragments
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.saved.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
            }
            "cm" => self.state.ctm = Matrix::from_operands(op).then(&self.state.ctm),
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.state.font = name.clone();
                }
                self.state.font_size = op.number(1, DEFAULT_FONT_SIZE).abs();
            }
            "Tc" => self.state.char_spacing = op.number(0, 0.0),
            "Tw" => self.state.word_spacing = op.number(0, 0.0),
            "TL" => self.state.leading = op.number(0, 0.0),
            "Td" => self.move_line(op.number(0, 0.0), op.number(1, 0.0)),
            "TD" => {
                let ty = op.number(1, 0.0);
                self.state.leading = -ty;
                self.move_line(op.number(0, 0.0), ty);
            }
            "Tm" => {
                self.line_matrix = Matrix::from_operands(op);
                self.text_matrix = self.line_matrix;
            }
            "T*" => self.next_line(),
            "Tj" => self.show(op.operands.get(..1).unwrap_or(&[])),
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                self.show(op.operands.get(..1).unwrap_or(&[]));
            }
            "\"" => {
                self.state.word_spacing = op.number(0, 0.0);
                self.state.char_spacing = op.number(1, 0.0);
                self.next_line();
                self.show(op.operands.get(2..3).unwrap_or(&[]));
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.state.leading != 0.0 {
            self.state.leading
        } else {
            self.state.font_size
        };
        self.move_line(0.0, -leading);
    }

    /// Advance the text matrix by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    /// Estimated advance of a decoded string, in text space.
    fn estimate_advance(&self, text: &str) -> f32 {
        let chars = text.chars().count() as f32;
        let spaces = text.chars().filter(|&c| c == ' ').count() as f32;
        chars * (GLYPH_WIDTH_EM * self.state.font_size + self.state.char_spacing)
            + spaces * self.state.word_spacing
    }

    /// Show a sequence of strings and TJ adjustments as one fragment.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text || items.is_empty() {
            return;
        }

        let start = self.text_matrix.then(&self.state.ctm);
        let mut text = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let piece = self
                        .backend
                        .decode_text(self.page_id, &self.state.font, bytes);
                    self.advance(self.estimate_advance(&piece));
                    text.push_str(&piece);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_f32().unwrap_or(0.0);
                    self.advance(adjustment / 1000.0 * self.state.font_size);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && text.chars().last().is_some_and(|c| !is_gap_neutral(c))
                    {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        let end = self.text_matrix.then(&self.state.ctm);
        self.emit(text, &start, &end);
    }

    fn emit(&mut self, text: String, start: &Matrix, end: &Matrix) {
        let text: String = text.nfkc().collect();
        let (Some(first), Some(last_char)) = (text.chars().next(), text.chars().last()) else {
            return;
        };

        let size = self.state.font_size * start.vertical_scale();
        let x0 = start.e;
        let y0 = self.page_height - start.f;
        let width = (end.e - start.e).hypot(end.f - start.f);

        let text = match self.last {
            Some(prev)
                if (prev.y0 - y0).abs() < size * 0.5
                    && x0 - prev.x_end > size * SHOW_GAP_EM
                    && !is_gap_neutral(prev.last_char)
                    && !is_gap_neutral(first) =>
            {
                format!(" {}", text)
            }
            _ => text,
        };

        self.last = Some(LastShow {
            y0,
            x_end: x0 + width,
            last_char,
        });

        let bold = self
            .fonts
            .get(&self.state.font)
            .map(|name| is_bold_font(name))
            .unwrap_or_else(|| is_bold_font(&String::from_utf8_lossy(&self.state.font)));

        self.fragments.push(
            Fragment::new(text, size, x0, y0, self.page_number)
                .bold(bold)
                .with_width(width),
        );
    }
}

/// Extracts fragments and table regions from every page of a document.
pub struct FragmentExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    options: &'a ExtractOptions,
    detector: TableDetector,
}

impl<'a, B: PdfBackend + ?Sized> FragmentExtractor<'a, B> {
    /// Create an extractor over a loaded backend.
    pub fn new(backend: &'a B, options: &'a ExtractOptions) -> Self {
        Self {
            backend,
            options,
            detector: TableDetector::with_config(options.table_config.clone()),
        }
    }

    /// Extract every page, honoring the error mode and page limit.
    pub fn extract(&self) -> Result<ExtractedDocument> {
        let mut doc = ExtractedDocument::new();

        for (number, page_id) in self.backend.pages() {
            if !self.options.includes_page(number) {
                break;
            }

            match self.extract_page(number, page_id) {
                Ok(page) => doc.add_page(page),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => log::warn!("Skipping page {}: {}", number, e),
                },
            }
        }

        log::debug!(
            "Extracted {} fragments and {} tables from {} pages",
            doc.fragment_count(),
            doc.table_count(),
            doc.pages.len()
        );

        Ok(doc)
    }

    /// Extract one page by its 1-based number.
    pub fn page(&self, number: u32) -> Result<PageContent> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, pages.len() as u32))?;
        self.extract_page(number, page_id)
    }

    /// Extract a single page.
    pub fn extract_page(&self, number: u32, page_id: PageId) -> Result<PageContent> {
        let page_error = |e: Error| Error::TextExtract {
            page: number,
            reason: e.to_string(),
        };

        let mut page = PageContent::new(number);

        let data = self.backend.page_content(page_id).map_err(page_error)?;
        if data.is_empty() {
            return Ok(page);
        }
        let ops = self.backend.decode_content(&data).map_err(page_error)?;

        let fonts = self
            .backend
            .page_fonts(page_id)
            .map_err(page_error)?
            .into_iter()
            .map(|font| (font.name, font.base_font))
            .collect();

        let (_, page_height) = self.backend.page_size(page_id);

        let walker = PageWalker {
            backend: self.backend,
            page_id,
            page_number: number,
            page_height,
            fonts,
            state: GraphicsState::default(),
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            last: None,
            fragments: Vec::new(),
        };
        page.fragments = walker.walk(&ops);

        if self.options.detect_tables {
            page.tables = self.detector.detect(number, &page.fragments);
        }

        log::trace!(
            "Page {}: {} fragments, {} tables",
            number,
            page.fragments.len(),
            page.tables.len()
        );

        Ok(page)
    }
}

/// Extract fragments from a PDF file.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<ExtractedDocument> {
    let path = path.as_ref();
    let version = detect::sniff_file(path)?;
    log::debug!("{}: PDF {}", path.display(), version);

    let backend = LopdfBackend::load_file(path)?;
    FragmentExtractor::new(&backend, options).extract()
}

/// Extract fragments from PDF bytes.
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<ExtractedDocument> {
    detect::sniff_version(data)?;
    let backend = LopdfBackend::load_bytes(data)?;
    FragmentExtractor::new(&backend, options).extract()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{decode_text_simple, BackendFontInfo};

    /// In-memory backend serving pre-built operations.
    struct MockBackend {
        pages: Vec<Vec<ContentOp>>,
        broken_page: Option<u32>,
    }

    impl MockBackend {
        fn new(pages: Vec<Vec<ContentOp>>) -> Self {
            Self {
                pages,
                broken_page: None,
            }
        }
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.pages.len() as u32).map(|n| (n, (n, 0))).collect()
        }

        fn page_size(&self, _page: PageId) -> (f32, f32) {
            (612.0, 792.0)
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![
                BackendFontInfo {
                    name: b"F1".to_vec(),
                    base_font: "Helvetica".to_string(),
                },
                BackendFontInfo {
                    name: b"F2".to_vec(),
                    base_font: "Helvetica-Bold".to_string(),
                },
            ])
        }

        fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
            if Some(page.0) == self.broken_page {
                return Err(Error::PdfParse("bad stream".to_string()));
            }
            // Page index travels through the byte buffer
            Ok(vec![page.0 as u8])
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.pages[data[0] as usize - 1].clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn num(v: f32) -> PdfValue {
        PdfValue::Real(v)
    }

    fn s(text: &str) -> PdfValue {
        PdfValue::Str(text.as_bytes().to_vec())
    }

    fn font(name: &str, size: f32) -> ContentOp {
        ContentOp::new("Tf", vec![PdfValue::Name(name.as_bytes().to_vec()), num(size)])
    }

    fn td(x: f32, y: f32) -> ContentOp {
        ContentOp::new("Td", vec![num(x), num(y)])
    }

    fn tj(text: &str) -> ContentOp {
        ContentOp::new("Tj", vec![s(text)])
    }

    fn extract(pages: Vec<Vec<ContentOp>>) -> ExtractedDocument {
        let backend = MockBackend::new(pages);
        let options = ExtractOptions::default();
        FragmentExtractor::new(&backend, &options).extract().unwrap()
    }

    #[test]
    fn test_position_size_and_bold() {
        let doc = extract(vec![vec![
            ContentOp::new("BT", vec![]),
            font("F2", 16.0),
            td(50.0, 712.0),
            tj("1. Introduction"),
            font("F1", 11.0),
            td(0.0, -30.0),
            tj("Body text"),
            ContentOp::new("ET", vec![]),
        ]]);

        let fragments = &doc.pages[0].fragments;
        assert_eq!(fragments.len(), 2);

        assert_eq!(fragments[0].text, "1. Introduction");
        assert_eq!(fragments[0].font_size, 16.0);
        assert!(fragments[0].bold);
        assert_eq!(fragments[0].x0, 50.0);
        assert_eq!(fragments[0].y0, 80.0);

        assert!(!fragments[1].bold);
        assert_eq!(fragments[1].y0, 110.0);
        assert!(fragments[1].y0 > fragments[0].y0);
    }

    #[test]
    fn test_text_matrix_scale_and_ctm() {
        let doc = extract(vec![vec![
            ContentOp::new("q", vec![]),
            ContentOp::new("cm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(10.0), num(20.0)]),
            ContentOp::new("BT", vec![]),
            font("F1", 1.0),
            ContentOp::new("Tm", vec![num(18.0), num(0.0), num(0.0), num(18.0), num(40.0), num(700.0)]),
            tj("Scaled"),
            ContentOp::new("ET", vec![]),
            ContentOp::new("Q", vec![]),
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            td(40.0, 700.0),
            tj("Restored"),
            ContentOp::new("ET", vec![]),
        ]]);

        let fragments = &doc.pages[0].fragments;
        assert_eq!(fragments[0].font_size, 18.0);
        assert_eq!(fragments[0].x0, 50.0);
        assert_eq!(fragments[0].y0, 72.0);
        assert_eq!(fragments[1].x0, 40.0);
        assert_eq!(fragments[1].y0, 92.0);
    }

    #[test]
    fn test_tj_array_spacing() {
        let doc = extract(vec![vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            td(72.0, 700.0),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    s("Hello"),
                    PdfValue::Integer(-250),
                    s("World"),
                    PdfValue::Integer(-30),
                    s("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ]]);

        assert_eq!(doc.pages[0].fragments[0].text, "Hello World!");
    }

    #[test]
    fn test_gap_between_shows_becomes_space() {
        let doc = extract(vec![vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            td(72.0, 700.0),
            tj("Annual"),
            // "Annual" is estimated at 30pt wide; next show starts 40pt later
            td(40.0, 0.0),
            tj("Report"),
            // Continues right after the estimated end
            td(30.0, 0.0),
            tj("s"),
            ContentOp::new("ET", vec![]),
        ]]);

        let texts: Vec<&str> = doc.pages[0]
            .fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Annual", " Report", "s"]);
    }

    #[test]
    fn test_next_line_operators() {
        let doc = extract(vec![vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            ContentOp::new("TL", vec![num(14.0)]),
            td(72.0, 700.0),
            tj("first"),
            ContentOp::new("T*", vec![]),
            tj("second"),
            ContentOp::new("'", vec![s("third")]),
            ContentOp::new("TD", vec![num(0.0), num(-20.0)]),
            tj("fourth"),
            ContentOp::new("ET", vec![]),
        ]]);

        let ys: Vec<f32> = doc.pages[0].fragments.iter().map(|f| f.y0).collect();
        assert_eq!(ys, vec![92.0, 106.0, 120.0, 140.0]);
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let doc = extract(vec![vec![font("F1", 10.0), tj("stray")]]);
        assert!(doc.pages[0].fragments.is_empty());
    }

    #[test]
    fn test_ligatures_normalized() {
        let doc = extract(vec![vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            td(72.0, 700.0),
            tj("\u{FB01}nance"),
            ContentOp::new("ET", vec![]),
        ]]);
        assert_eq!(doc.pages[0].fragments[0].text, "finance");
    }

    #[test]
    fn test_error_modes() {
        let page = vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            tj("ok"),
            ContentOp::new("ET", vec![]),
        ];
        let mut backend = MockBackend::new(vec![page.clone(), page]);
        backend.broken_page = Some(2);

        let strict = ExtractOptions::default();
        let err = FragmentExtractor::new(&backend, &strict).extract().unwrap_err();
        assert!(matches!(err, Error::TextExtract { page: 2, .. }));

        let lenient = ExtractOptions::default().lenient();
        let doc = FragmentExtractor::new(&backend, &lenient).extract().unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].number, 1);
    }

    #[test]
    fn test_single_page_lookup() {
        let page = vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            tj("ok"),
            ContentOp::new("ET", vec![]),
        ];
        let backend = MockBackend::new(vec![page.clone(), page]);
        let options = ExtractOptions::default();
        let extractor = FragmentExtractor::new(&backend, &options);

        assert_eq!(extractor.page(2).unwrap().number, 2);
        assert!(matches!(
            extractor.page(3),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }

    #[test]
    fn test_max_pages() {
        let page = vec![
            ContentOp::new("BT", vec![]),
            font("F1", 10.0),
            tj("ok"),
            ContentOp::new("ET", vec![]),
        ];
        let backend = MockBackend::new(vec![page.clone(), page.clone(), page]);
        let options = ExtractOptions::default().with_max_pages(2);
        let doc = FragmentExtractor::new(&backend, &options).extract().unwrap();
        assert_eq!(doc.pages.len(), 2);
    }

    #[test]
    fn test_tables_detected_per_page() {
        let mut ops = vec![ContentOp::new("BT", vec![]), font("F1", 10.0)];
        for (row, cells) in [["Name", "Age"], ["Alice", "30"], ["Bob", "25"]].iter().enumerate() {
            let y = 500.0 - row as f32 * 15.0;
            for (col, text) in cells.iter().enumerate() {
                let x = 100.0 + col as f32 * 100.0;
                ops.push(ContentOp::new("Tm", vec![num(1.0), num(0.0), num(0.0), num(1.0), num(x), num(y)]));
                ops.push(tj(text));
            }
        }
        ops.push(ContentOp::new("ET", vec![]));

        let doc = extract(vec![ops.clone()]);
        assert_eq!(doc.pages[0].tables.len(), 1);

        let backend = MockBackend::new(vec![ops]);
        let options = ExtractOptions::default().with_tables(false);
        let doc = FragmentExtractor::new(&backend, &options).extract().unwrap();
        assert!(doc.pages[0].tables.is_empty());
    }

    #[test]
    fn test_bold_font_names() {
        assert!(is_bold_font("Helvetica-Bold"));
        assert!(is_bold_font("ABCDEF+Arial-BoldMT"));
        assert!(is_bold_font("Roboto-Black"));
        assert!(is_bold_font("Avenir Heavy"));
        assert!(!is_bold_font("Times-Roman"));
    }

    #[test]
    fn test_extract_bytes_rejects_non_pdf() {
        let err = extract_bytes(b"hello", &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}
