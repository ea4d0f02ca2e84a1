//! Font-size statistics used as classification thresholds.

use std::cmp::Ordering;

use crate::model::{Fragment, HeadingLevel, Line};

/// Median of `(value, weight)` pairs, as if each value were repeated
/// `weight` times. Zero-weight entries are ignored.
pub fn weighted_median(values: &[(f32, usize)]) -> Option<f32> {
    let mut sorted: Vec<(f32, usize)> = values.iter().copied().filter(|(_, w)| *w > 0).collect();
    let total: usize = sorted.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return None;
    }
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // Zero-based positions of the middle element(s) in the expanded list
    let lower = (total - 1) / 2;
    let upper = total / 2;
    let value_at = |position: usize| {
        let mut seen = 0;
        for (value, weight) in &sorted {
            seen += weight;
            if position < seen {
                return *value;
            }
        }
        sorted[sorted.len() - 1].0
    };

    Some((value_at(lower) + value_at(upper)) / 2.0)
}

/// Font sizes of `fragments`, each weighed by its visible glyphs.
pub fn glyph_weighted_sizes<'a, I>(fragments: I) -> Vec<(f32, usize)>
where
    I: IntoIterator<Item = &'a Fragment>,
{
    fragments
        .into_iter()
        .map(|f| (f.font_size, f.glyph_count()))
        .collect()
}

/// Body-text baseline: median font size over every visible glyph in the
/// document.
pub fn median_font_size(fragments: &[Fragment], default: f32) -> f32 {
    weighted_median(&glyph_weighted_sizes(fragments)).unwrap_or(default)
}

/// Sizes are compared at 0.01pt so float noise does not split a rank.
pub(crate) fn size_key(size: f32) -> i64 {
    (size * 100.0).round() as i64
}

/// Distinct heading font sizes, largest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingSizes {
    ranked: Vec<i64>,
    levels: usize,
}

impl HeadingSizes {
    /// Rank the distinct sizes of accepted heading lines.
    ///
    /// `levels` is how many of the largest sizes get their own level; every
    /// smaller size shares the last one.
    pub fn from_headings(headings: &[Line], levels: usize) -> Self {
        let mut ranked: Vec<i64> = headings.iter().map(|h| size_key(h.size)).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked.dedup();

        Self {
            ranked,
            levels: levels.clamp(1, 3),
        }
    }

    /// Number of distinct sizes seen.
    pub fn distinct(&self) -> usize {
        self.ranked.len()
    }

    /// Distinct sizes in points, largest first.
    pub fn sizes(&self) -> Vec<f32> {
        self.ranked.iter().map(|k| *k as f32 / 100.0).collect()
    }

    /// Zero-based rank of a size, if it was seen.
    pub fn rank(&self, size: f32) -> Option<usize> {
        let key = size_key(size);
        self.ranked.iter().position(|k| *k == key)
    }

    /// Level implied by font size alone.
    ///
    /// Unknown sizes fall to the deepest level, so the mapping is total.
    pub fn level_for(&self, size: f32) -> HeadingLevel {
        let depth = match self.rank(size) {
            Some(rank) => (rank + 1).min(self.levels),
            None => self.levels,
        };
        HeadingLevel::from_depth(depth)
    }
}
