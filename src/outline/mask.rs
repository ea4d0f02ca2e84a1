//! Table mask: flags fragments that fall inside a detected table.

use crate::model::{Fragment, PageContent};

/// Flatten pages into one fragment list, marking fragments inside any table
/// region of their own page.
///
/// The input is left untouched; a fragment already flagged by the extractor
/// stays flagged.
pub fn apply_table_mask(pages: &[PageContent]) -> Vec<Fragment> {
    let mut masked = Vec::with_capacity(pages.iter().map(|p| p.fragments.len()).sum());

    for page in pages {
        for fragment in &page.fragments {
            let in_table = fragment.in_table
                || page
                    .tables
                    .iter()
                    .any(|table| table.contains_fragment(fragment));
            masked.push(Fragment {
                in_table,
                ..fragment.clone()
            });
        }
    }

    let flagged = masked.iter().filter(|f| f.in_table).count();
    log::debug!(
        "Table mask: {} of {} fragments inside tables",
        flagged,
        masked.len()
    );

    masked
}
