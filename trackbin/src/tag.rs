//! A fully resolved TAG: configuration, format descriptor and bin grid.

use thiserror::Error;

use crate::config::{ConfigError, Environment, TagConfig};
use crate::database::{DatabaseError, TrackDatabase};
use crate::format::{FormatDescriptor, FormatError};
use crate::grid::{BinGrid, GridError};

/// Errors resolving a TAG.
#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Everything needed to bin, store and query the tracks of one TAG.
#[derive(Debug, Clone)]
pub struct Tag {
    config: TagConfig,
    descriptor: FormatDescriptor,
    grid: BinGrid,
}

impl Tag {
    /// Resolve `name` against the environment's home.
    pub fn open(env: &Environment, name: &str) -> Result<Self, TagError> {
        let config = TagConfig::load(env, name).map_err(|e| match e {
            ConfigError::NotFound(path) => TagError::Format(FormatError::ConfigNotFound(path)),
            other => TagError::Config(other),
        })?;
        let descriptor = FormatDescriptor::load_for(env, &config)?;
        Self::from_parts(config, descriptor)
    }

    /// Assemble a TAG from an in-memory configuration and descriptor.
    pub fn from_parts(config: TagConfig, descriptor: FormatDescriptor) -> Result<Self, TagError> {
        let grid = config.grid(descriptor.is_geographic())?;
        tracing::debug!(
            tag = %config.tag,
            nx = grid.nx(),
            ny = grid.ny(),
            periodic = grid.is_periodic(),
            "Resolved TAG grid"
        );
        Ok(Self {
            config,
            descriptor,
            grid,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.tag
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    pub fn grid(&self) -> &BinGrid {
        &self.grid
    }

    /// Open this TAG's track database in its configured byte order.
    pub fn open_database(&self, env: &Environment) -> Result<TrackDatabase, TagError> {
        Ok(TrackDatabase::open(
            env,
            &self.config.tag,
            self.grid.n_bins(),
            self.config.byte_order,
        )?)
    }

    /// Store a database in this TAG's configured byte order.
    pub fn store_database(&self, env: &Environment, db: &TrackDatabase) -> Result<(), TagError> {
        Ok(db.store(env, self.config.byte_order)?)
    }
}
