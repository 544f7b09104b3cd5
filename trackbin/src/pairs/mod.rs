//! Candidate-pair generation.
//!
//! Two tracks are a candidate pair when they share at least one bin. The
//! result is a superset of the tracks that actually cross and a subset of
//! all track pairs; no geometry is computed here.
//!
//! Every pair is emitted once no matter how many bins the two tracks
//! share, and a track is never paired with itself.

mod allow_list;
mod generator;


pub use allow_list::AllowList;
pub use generator::{CandidatePair, PairGenerator, PairMatrix, PairMode};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from pairing runs.
#[derive(Debug, Error)]
pub enum PairError {
    #[error("Failed to read allow-list {path}: {source}")]
    AllowListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
