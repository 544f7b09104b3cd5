use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading, writing or updating a track database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The registry and bin index are inconsistent or unreadable
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// A track id that is not in the registry
    #[error("Unknown track id {0}")]
    UnknownTrack(u32),

    /// Track name is empty or contains a line break
    #[error("Invalid track name: {0:?}")]
    InvalidTrackName(String),

    /// No database files for the TAG
    #[error("Track database not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatabaseError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        DatabaseError::CorruptIndex(msg.into())
    }
}
