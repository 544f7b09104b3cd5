//! CLI runner for common setup and operations.
//!
//! Encapsulates environment resolution, logging initialization and TAG
//! opening to reduce duplication across command handlers.

use std::path::PathBuf;

use tracing::info;
use trackbin::config::{Environment, LOG_FILE_NAME};
use trackbin::database::TrackDatabase;
use trackbin::logging::{init_logging, LoggingGuard};
use trackbin::tag::Tag;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    env: Environment,
}

impl CliRunner {
    /// Resolve the home directory and start logging into `<home>/logs`.
    ///
    /// # Arguments
    ///
    /// * `home` - Explicit home directory; otherwise `TRACKBIN_HOME` or
    ///   `~/.trackbin`
    /// * `verbose` - When true, enables debug-level logging regardless of
    ///   RUST_LOG
    pub fn new(home: Option<PathBuf>, verbose: bool) -> Result<Self, CliError> {
        let env = home
            .map(Environment::new)
            .unwrap_or_else(Environment::from_env);

        let logging_guard = init_logging(&env.log_dir(), LOG_FILE_NAME, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self { logging_guard, env })
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("trackbin v{}", trackbin::VERSION);
        info!(home = %self.env.home().display(), "trackbin CLI: {} command", command);
    }

    /// Resolve a TAG in this runner's home.
    pub fn open_tag(&self, name: &str) -> Result<Tag, CliError> {
        Ok(Tag::open(&self.env, name)?)
    }

    /// Open a TAG's database, optionally in the opposite byte order to the
    /// configured one.
    pub fn open_database(&self, tag: &Tag, swap: bool) -> Result<TrackDatabase, CliError> {
        if !swap {
            return Ok(tag.open_database(&self.env)?);
        }
        let order = tag.config().byte_order.swapped();
        info!(tag = tag.name(), byte_order = %order, "Reading bin index with swapped byte order");
        Ok(TrackDatabase::open(
            &self.env,
            tag.name(),
            tag.grid().n_bins(),
            order,
        )?)
    }
}
