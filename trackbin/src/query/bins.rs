//! Bin-center mode: which bins hold a track satisfying the constraints.

use tracing::debug;

use super::filter::ColumnFilter;
use super::{scanned_bins, QueryError, PROGRESS_INTERVAL};
use crate::database::TrackDatabase;
use crate::grid::{BinCoordinate, BinGrid, Region};

/// A qualifying bin.
#[derive(Debug, Clone, PartialEq)]
pub struct BinHit {
    pub index: u32,
    pub coord: BinCoordinate,
    pub center: (f64, f64),
    /// Ids of the tracks in the bin that satisfy the filter.
    pub tracks: Vec<u32>,
}

/// Bins, ascending, where at least one track carries every `must_have`
/// column and none of the `must_lack` columns locally.
pub fn query_bins(
    db: &TrackDatabase,
    grid: &BinGrid,
    filter: &ColumnFilter,
    region: Option<&Region>,
) -> Result<Vec<BinHit>, QueryError> {
    let mut hits = Vec::new();
    let mut scanned = 0usize;

    for bin in scanned_bins(db, grid, region) {
        scanned += 1;
        if scanned % PROGRESS_INTERVAL == 0 {
            debug!(scanned, hits = hits.len(), "Scanning bins");
        }

        let tracks: Vec<u32> = db
            .tracks_in_bin(bin)
            .iter()
            .filter(|t| filter.accepts(t.local_flags))
            .map(|t| t.track_id)
            .collect();
        if tracks.is_empty() {
            continue;
        }

        let coord = grid.bin_coordinate(bin)?;
        hits.push(BinHit {
            index: bin,
            coord,
            center: grid.bin_center(coord),
            tracks,
        });
    }

    debug!(scanned, hits = hits.len(), "Bin query complete");
    Ok(hits)
}
