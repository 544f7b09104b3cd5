//! Track-mode queries: which tracks satisfy column constraints.

use tracing::debug;

use super::filter::ColumnFilter;
use super::{scanned_bins, PROGRESS_INTERVAL};
use crate::database::TrackDatabase;
use crate::format::FormatDescriptor;
use crate::grid::{BinGrid, Region};

/// Whether one column holds data anywhere in a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPresence {
    pub name: String,
    pub present: bool,
}

/// A track that passed a column query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub id: u32,
    pub name: String,
    pub global_flags: u32,
    /// One entry per descriptor column, in column order.
    pub presence: Vec<ColumnPresence>,
}

/// Tracks whose columns satisfy `filter`, by ascending id.
///
/// `must_have` is tested against each track's global flags. `must_lack` is
/// tested per scanned bin: a track is dropped as soon as one scanned bin
/// shows a forbidden column present. With a region only bins overlapping it
/// are scanned; otherwise every occupied bin. Tracks not seen in any
/// scanned bin are not reported.
pub fn query_by_columns(
    db: &TrackDatabase,
    descriptor: &FormatDescriptor,
    grid: &BinGrid,
    filter: &ColumnFilter,
    region: Option<&Region>,
) -> Vec<TrackSummary> {
    let track_count = db.track_count();
    let mut seen = vec![false; track_count];
    let mut excluded = vec![false; track_count];
    let mut scanned = 0usize;

    for bin in scanned_bins(db, grid, region) {
        for entry in db.tracks_in_bin(bin) {
            let id = entry.track_id as usize;
            seen[id] = true;
            if filter.has_forbidden(entry.local_flags) {
                excluded[id] = true;
            }
        }

        scanned += 1;
        if scanned % PROGRESS_INTERVAL == 0 {
            debug!(scanned, "Scanning bins for column query");
        }
    }

    let summaries: Vec<TrackSummary> = db
        .tracks()
        .filter(|t| seen[t.id as usize] && !excluded[t.id as usize])
        .filter(|t| filter.has_required(t.global_flags))
        .map(|t| TrackSummary {
            id: t.id,
            name: t.name.clone(),
            global_flags: t.global_flags,
            presence: presence(descriptor, t.global_flags),
        })
        .collect();

    debug!(
        scanned,
        seen = seen.iter().filter(|s| **s).count(),
        matched = summaries.len(),
        must_have = filter.must_have,
        must_lack = filter.must_lack,
        "Column query complete"
    );

    summaries
}

fn presence(descriptor: &FormatDescriptor, flags: u32) -> Vec<ColumnPresence> {
    descriptor
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| ColumnPresence {
            name: field.name.clone(),
            present: flags & (1u32 << i) != 0,
        })
        .collect()
}
