//! Table region detection from text alignment.
//!
//! Tables are only needed as an exclusion mask, so this detector reports
//! bounding boxes and nothing about cell contents. It groups fragments into
//! rows, looks for left edges that line up across rows, and keeps runs of
//! rows that have at least two aligned cells.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{Fragment, TableRegion};

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping fragments into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum share of rows an edge must appear in to count as a column
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Width of the buckets left edges are snapped to (points)
    pub edge_bucket: f32,
    /// Distance within which a fragment counts as aligned to a column (points)
    pub alignment_tolerance: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            edge_bucket: 5.0,
            alignment_tolerance: 5.0,
        }
    }
}

/// Fragments sharing a baseline.
#[derive(Debug, Clone)]
struct Row<'a> {
    cells: Vec<&'a Fragment>,
}

/// Detects table regions on one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Find table regions among the fragments of page `page`.
    pub fn detect(&self, page: u32, fragments: &[Fragment]) -> Vec<TableRegion> {
        let visible: Vec<&Fragment> = fragments
            .iter()
            .filter(|f| f.page == page && !f.text.trim().is_empty())
            .collect();

        if visible.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(visible);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            log::trace!("TableDetector: page {} has {} columns", page, columns.len());
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region_rows = &rows[start..=end];
            let region_columns = self.detect_columns(region_rows);

            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region on page {} with {} columns",
                    page,
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(region_rows, &region_columns) {
                log::debug!("TableDetector: skipping list-like region on page {}", page);
                continue;
            }

            if let Some(region) = bounding_box(page, region_rows) {
                tables.push(region);
            }
        }

        log::debug!("TableDetector: page {} has {} tables", page, tables.len());
        tables
    }

    /// Group fragments into rows by baseline, top to bottom.
    fn group_into_rows<'a>(&self, mut fragments: Vec<&'a Fragment>) -> Vec<Row<'a>> {
        fragments.sort_by(|a, b| {
            a.y0.partial_cmp(&b.y0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<Row<'a>> = Vec::new();
        let mut anchor_y: Option<f32> = None;

        for fragment in fragments {
            let tolerance = fragment.font_size * self.config.y_tolerance_factor;
            match (anchor_y, rows.last_mut()) {
                (Some(y), Some(row)) if (fragment.y0 - y).abs() <= tolerance => {
                    row.cells.push(fragment);
                }
                _ => {
                    anchor_y = Some(fragment.y0);
                    rows.push(Row {
                        cells: vec![fragment],
                    });
                }
            }
        }

        rows
    }

    /// Left edges that line up across enough rows, merged when closer than
    /// the minimum column gap.
    fn detect_columns(&self, rows: &[Row<'_>]) -> Vec<f32> {
        let multi_cell: Vec<&Row<'_>> = rows.iter().filter(|r| r.cells.len() >= 2).collect();
        let considered: Vec<&Row<'_>> = if multi_cell.len() >= self.config.min_rows {
            multi_cell
        } else {
            rows.iter().collect()
        };

        let bucket = self.config.edge_bucket;
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &considered {
            let buckets: HashSet<i32> = row
                .cells
                .iter()
                .map(|f| (f.x0 / bucket).round() as i32)
                .collect();
            for b in buckets {
                *edge_counts.entry(b).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((considered.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(b, _)| b as f32 * bucket)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of consecutive rows that look tabular.
    fn find_regions(&self, rows: &[Row<'_>], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.is_table_row(row, columns) {
                start.get_or_insert(i);
                continue;
            }
            if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// At least two cells sit on distinct columns and enough of the row is
    /// aligned.
    fn is_table_row(&self, row: &Row<'_>, columns: &[f32]) -> bool {
        if row.cells.is_empty() {
            return false;
        }

        let tolerance = self.config.alignment_tolerance;
        let hits: HashSet<usize> = row
            .cells
            .iter()
            .filter_map(|f| columns.iter().position(|c| (f.x0 - c).abs() <= tolerance))
            .collect();
        let aligned = row
            .cells
            .iter()
            .filter(|f| columns.iter().any(|c| (f.x0 - c).abs() <= tolerance))
            .count();

        hits.len() >= 2
            && aligned as f32 / row.cells.len() as f32 >= self.config.min_alignment_ratio
    }
}

fn bounding_box(page: u32, rows: &[Row<'_>]) -> Option<TableRegion> {
    let cells = || rows.iter().flat_map(|r| r.cells.iter());
    cells().next()?;

    let x0 = cells().map(|f| f.x0).fold(f32::INFINITY, f32::min);
    let x1 = cells().map(|f| f.x1()).fold(f32::NEG_INFINITY, f32::max);
    let y0 = cells().map(|f| f.y0).fold(f32::INFINITY, f32::min);
    let y1 = cells().map(|f| f.y0).fold(f32::NEG_INFINITY, f32::max);

    Some(TableRegion::new(page, x0, y0, x1, y1))
}

/// Numbered or bulleted lists split into marker and text fragments look
/// like two-column tables.
fn is_list_pattern(rows: &[Row<'_>], columns: &[f32]) -> bool {
    if rows.is_empty() || columns.len() < 2 {
        return false;
    }

    let mut bullets = 0usize;
    let mut numbers = 0usize;
    for row in rows {
        let first = row
            .cells
            .iter()
            .min_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
        if let Some(cell) = first {
            if is_bullet_marker(&cell.text) {
                bullets += 1;
            } else if is_number_marker(&cell.text) {
                numbers += 1;
            }
        }
    }

    let total = rows.len() as f32;
    bullets as f32 / total >= 0.5 || (columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "➤"
    )
}

/// `1`, `1.`, `1)`, `2.1`, `3.2.1.`, `a.`, `B)`.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let body = cleaned
        .strip_suffix('.')
        .or_else(|| cleaned.strip_suffix(')'))
        .unwrap_or(&cleaned);

    if body.is_empty() {
        return false;
    }

    let dotted_number = body
        .split('.')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    let letter = body.chars().count() == 1
        && body.chars().all(char::is_alphabetic)
        && body.len() != cleaned.len();

    dotted_number || letter
}
