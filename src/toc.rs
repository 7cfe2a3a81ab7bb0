use std::collections::HashMap;

use crate::assets::PageAsset;
use crate::formats::IndexEntry;
use crate::report::{Event, Reporter};

/// A navigation target: the page it points at and the index entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub file_id: String,
    pub page_id: String,
    /// Position in the index; the label lives there.
    pub position: usize,
}

/// Resolves index entries 1.. against page file names.
///
/// Matching is exact and case-sensitive. Output follows index order; entries
/// without a matching page are reported and dropped. Entry 0 labels the cover
/// and is never matched.
pub fn reconcile(index: &[IndexEntry], pages: &[PageAsset], reporter: &dyn Reporter) -> Vec<TocEntry> {
    let by_name = pages
        .iter()
        .map(|page| (page.file_name.as_str(), page))
        .collect::<HashMap<_, _>>();

    let mut entries = Vec::new();
    let mut unmatched = 0_usize;
    for (position, entry) in index.iter().enumerate().skip(1) {
        match by_name.get(entry.file_name.as_str()) {
            Some(page) => entries.push(TocEntry {
                file_id: page.file_id.clone(),
                page_id: page.id.clone(),
                position,
            }),
            None => {
                unmatched += 1;
                reporter.report(Event::TocEntryUnmatched {
                    position,
                    file_name: entry.file_name.clone(),
                });
            }
        }
    }

    reporter.report(Event::ReconciliationComplete {
        entries: entries.len(),
        unmatched,
    });
    entries
}
