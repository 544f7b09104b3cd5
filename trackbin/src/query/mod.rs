//! Queries over a track database by column presence.
//!
//! Two modes share the same [`ColumnFilter`]:
//!
//! - [`query_by_columns`] reports tracks
//! - [`query_bins`] reports bins (with their centers)
//!
//! Both are pure reads. Finding nothing is an empty result, not an error.
//!
//! # Example
//!
//! ```
//! use trackbin::database::TrackDatabase;
//! use trackbin::format::FormatDescriptor;
//! use trackbin::grid::{BinGrid, Region};
//! use trackbin::query::{query_by_columns, ColumnFilter};
//!
//! let descriptor = FormatDescriptor::parse("x d\ny d\ngrav f\n").unwrap();
//! let grid = BinGrid::new(Region::new(0.0, 10.0, 0.0, 10.0).unwrap(), 5.0, 5.0, false).unwrap();
//!
//! let mut db = TrackDatabase::new("DEMO");
//! let id = db.register_track("line1").unwrap();
//! db.set_global_flags(id, 0b111).unwrap();
//! db.add_to_bin(0, id, 0b111).unwrap();
//!
//! let filter = ColumnFilter::from_lists(&descriptor, "grav", "").unwrap();
//! let found = query_by_columns(&db, &descriptor, &grid, &filter, None);
//! assert_eq!(found[0].name, "line1");
//! ```

mod bins;
mod filter;
mod tracks;

#[cfg(test)]
mod tests;

pub use bins::{query_bins, BinHit};
pub use filter::ColumnFilter;
pub use tracks::{query_by_columns, ColumnPresence, TrackSummary};

use thiserror::Error;

use crate::database::TrackDatabase;
use crate::format::FormatError;
use crate::grid::{BinGrid, GridError, Region};

/// Bins between progress log lines.
const PROGRESS_INTERVAL: usize = 10_000;

/// Errors building or running a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Bins a query visits: overlapping bins for a region, else every occupied
/// bin.
fn scanned_bins(db: &TrackDatabase, grid: &BinGrid, region: Option<&Region>) -> Vec<u32> {
    match region {
        Some(region) => grid.bins_in_region(region),
        None => db.occupied_bins().collect(),
    }
}
