//! Title selection.

use crate::model::Heading;

use super::stats::size_key;

/// The largest heading on page 1, first one winning ties. Sizes compare
/// at the same 0.01pt precision as the size ranking.
pub fn select_title(headings: &[Heading]) -> Option<&Heading> {
    headings
        .iter()
        .filter(|h| h.page() == 1)
        .fold(None, |best: Option<&Heading>, h| match best {
            Some(b) if size_key(b.size()) >= size_key(h.size()) => Some(b),
            _ => Some(h),
        })
}

/// Title text, or `fallback` when page 1 has no heading.
pub fn title_or(headings: &[Heading], fallback: &str) -> String {
    select_title(headings)
        .map(|h| h.text().to_string())
        .unwrap_or_else(|| fallback.to_string())
}
