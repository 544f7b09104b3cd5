//! Error types for the format module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying a format descriptor.
#[derive(Debug, Error)]
pub enum FormatError {
    /// TAG configuration or format definition does not exist.
    #[error("Configuration not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Definition text could not be parsed.
    #[error("Malformed format definition: {0}")]
    ConfigMalformed(String),

    /// Column name is not part of the descriptor.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Field index does not fit the 32-bit column mask.
    #[error("Field index {0} is out of range for a 32-bit column mask")]
    IndexOutOfRange(usize),

    /// TAG configuration exists but could not be read.
    #[error("Failed to read TAG configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Definition file exists but could not be read.
    #[error("Failed to read format definition: {0}")]
    Io(#[from] std::io::Error),
}
