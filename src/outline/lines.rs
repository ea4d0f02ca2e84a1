//! Line grouping: merges fragments that share a visual line.

use std::cmp::Ordering;

use crate::model::{Fragment, Line};

use super::stats::{glyph_weighted_sizes, weighted_median};

/// Stable sort into reading order: page, then top-to-bottom, then
/// left-to-right. Fragments at identical positions keep their stream order.
pub fn reading_order(mut fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| a.y0.partial_cmp(&b.y0).unwrap_or(Ordering::Equal))
            .then_with(|| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
    });
    fragments
}

/// Group fragments (already in reading order) into lines.
///
/// A new line starts when the page changes or when a fragment's baseline is
/// `tolerance` or more away from the previous fragment's. Lines with no text
/// after trimming are dropped.
pub fn group_into_lines(fragments: &[Fragment], tolerance: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<&Fragment> = Vec::new();

    for fragment in fragments {
        let starts_new_line = current.last().is_some_and(|last| {
            last.page != fragment.page || (fragment.y0 - last.y0).abs() >= tolerance
        });

        if starts_new_line {
            lines.extend(build_line(&current));
            current.clear();
        }
        current.push(fragment);
    }
    lines.extend(build_line(&current));

    log::debug!(
        "Grouped {} fragments into {} lines",
        fragments.len(),
        lines.len()
    );

    lines
}

fn build_line(fragments: &[&Fragment]) -> Option<Line> {
    let first = fragments.first()?;

    let text: String = fragments.iter().map(|f| f.text.as_str()).collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let sizes = glyph_weighted_sizes(fragments.iter().copied());
    let x0 = fragments
        .iter()
        .map(|f| f.x0)
        .fold(f32::INFINITY, f32::min);

    Some(Line {
        text: text.to_string(),
        size: weighted_median(&sizes).unwrap_or(first.font_size),
        bold: fragments.iter().any(|f| f.bold),
        x0,
        page: first.page,
        in_table: fragments.iter().any(|f| f.in_table),
    })
}
