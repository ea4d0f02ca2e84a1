//! PDF backend abstraction.
//!
//! The extractor talks to a [`PdfBackend`] instead of `lopdf` directly, so the
//! content-stream walker can be tested against an in-memory backend and the
//! concrete PDF library stays in this file.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page has no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Parent links followed when looking up inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 16;

/// Font resource on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFontInfo {
    /// Resource name (key in the page's font dictionary)
    pub name: Vec<u8>,
    /// Base font name, e.g. "Helvetica-Bold"
    pub base_font: String,
}

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if the operand is a number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Build an operation.
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.to_string(),
            operands,
        }
    }

    /// Numeric operand at `index`, or `default`.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(PdfValue::as_f32)
            .unwrap_or(default)
    }
}

/// What the fragment extractor needs from a PDF library.
pub trait PdfBackend {
    /// All pages, as page number → page id.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page width and height in points.
    fn page_size(&self, page: PageId) -> (f32, f32);

    /// Fonts available on a page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Decompressed content stream bytes of a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse content stream bytes into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a string operand with the named font's encoding.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Decode text without font information: UTF-16BE with BOM, then UTF-8,
/// then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// [`PdfBackend`] over `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory buffer.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Look up a page attribute, following `/Parent` links for inherited
    /// values such as `/MediaBox`.
    fn inherited<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut current = dict;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = current.get(key) {
                return Some(value);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn stream_bytes(&self, obj: &Object) -> Option<Vec<u8>> {
        match self.resolve(obj) {
            Object::Stream(stream) => stream.get_plain_content().ok(),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page: PageId) -> (f32, f32) {
        let Ok(dict) = self.doc.get_dictionary(page) else {
            return DEFAULT_PAGE_SIZE;
        };

        let media_box = self
            .inherited(dict, b"MediaBox")
            .map(|obj| self.resolve(obj))
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .filter_map(|o| match o {
                        Object::Integer(i) => Some(*i as f32),
                        Object::Real(r) => Some(*r),
                        _ => None,
                    })
                    .collect::<Vec<f32>>()
            });

        match media_box.as_deref() {
            Some([x0, y0, x1, y1]) => ((x1 - x0).abs(), (y1 - y0).abs()),
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let fonts = self.doc.get_page_fonts(page)?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                base_font: dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        let dict = self.doc.get_dictionary(page)?;
        let Ok(contents) = dict.get(b"Contents") else {
            // Blank page
            return Ok(Vec::new());
        };

        match self.resolve(contents) {
            Object::Array(parts) => {
                let mut data = Vec::new();
                for part in parts {
                    if let Some(bytes) = self.stream_bytes(part) {
                        data.extend_from_slice(&bytes);
                        data.push(b'\n');
                    }
                }
                Ok(data)
            }
            other => self
                .stream_bytes(other)
                .ok_or_else(|| Error::PdfParse("invalid content stream".to_string())),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operands: op.operands.iter().map(convert_object).collect(),
                operator: op.operator,
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        self.doc
            .get_page_fonts(page)
            .ok()
            .and_then(|fonts| fonts.get(font_name).copied())
            .and_then(|font| font.get_font_encoding(&self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(s, _) => PdfValue::Str(s.clone()),
        Object::Array(items) => PdfValue::Array(items.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(
            decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]),
            "Hi"
        );
    }

    #[test]
    fn test_operand_numbers() {
        let op = ContentOp::new(
            "Td",
            vec![PdfValue::Integer(72), PdfValue::Real(-14.5), PdfValue::Other],
        );
        assert_eq!(op.number(0, 0.0), 72.0);
        assert_eq!(op.number(1, 0.0), -14.5);
        assert_eq!(op.number(2, 1.0), 1.0);
        assert_eq!(op.number(9, 3.0), 3.0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(LopdfBackend::load_bytes(b"not a pdf at all").is_err());
    }
}
