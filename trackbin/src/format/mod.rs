//! Format descriptors: the column layout of a data system (TAG).
//!
//! A [`FormatDescriptor`] lists the columns of every track file belonging to
//! a TAG, with their encoding, scale/offset and NaN proxy. Column `i` owns
//! bit `1 << i` of every presence mask stored in the track database, so the
//! descriptor is what gives those masks meaning.
//!
//! # Example
//!
//! ```
//! use trackbin::format::FormatDescriptor;
//!
//! let descriptor = FormatDescriptor::parse("#GEO\nlon d\nlat d\ndepth f Y 1 0 -9999\n").unwrap();
//! assert_eq!(descriptor.x_column(), Some(0));
//! assert_eq!(descriptor.mask_from_list("lat,depth").unwrap(), 0b110);
//! ```

mod descriptor;
mod error;
mod parser;
mod types;

pub use descriptor::{FormatDescriptor, MAX_FIELDS};
pub use error::FormatError;
pub use parser::parse_definition;
pub use types::{ColumnRef, ColumnRole, Encoding, FieldSpec, FileKind, LonConvention};

use crate::config::{ConfigError, Environment, TagConfig};

impl FormatDescriptor {
    /// Parse definition text. See [`parse_definition`].
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        parse_definition(text)
    }

    /// Load the descriptor of `tag`.
    ///
    /// Reads the TAG configuration, then the format definition it names.
    /// Either file missing is [`FormatError::ConfigNotFound`].
    pub fn load(env: &Environment, tag: &str) -> Result<Self, FormatError> {
        let config = TagConfig::load(env, tag).map_err(|e| match e {
            ConfigError::NotFound(path) => FormatError::ConfigNotFound(path),
            other => FormatError::Config(other),
        })?;
        Self::load_for(env, &config)
    }

    /// Load the definition named by an already loaded TAG configuration.
    pub fn load_for(env: &Environment, config: &TagConfig) -> Result<Self, FormatError> {
        let path = env
            .find_definition(&config.tag, &config.format)
            .ok_or_else(|| FormatError::ConfigNotFound(env.definition_path(&config.format)))?;

        let text = std::fs::read_to_string(&path)?;
        let descriptor = parse_definition(&text)?;

        tracing::debug!(
            tag = %config.tag,
            format = %config.format,
            path = %path.display(),
            columns = descriptor.len(),
            geographic = descriptor.is_geographic(),
            "Loaded format definition"
        );

        Ok(descriptor)
    }
}
