//! TAG configuration file handling (`<home>/<TAG>/<TAG>.tag`).
//!
//! Settings structs live in [`super::settings`], constants in
//! [`super::defaults`], parsing in [`super::parser`], and serialization in
//! [`super::writer`].

use ini::Ini;
use std::path::Path;
use thiserror::Error;

use super::environment::Environment;
use super::settings::TagConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TAG configuration file does not exist
    #[error("TAG configuration not found: {0}")]
    NotFound(std::path::PathBuf),

    /// Failed to read config file
    #[error("Failed to read TAG configuration: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write TAG configuration: {0}")]
    WriteError(String),

    /// Required key absent
    #[error("Missing configuration value: {section}.{key}")]
    MissingValue { section: String, key: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create TAG directory
    #[error("Failed to create TAG directory: {0}")]
    DirectoryError(std::io::Error),
}

impl TagConfig {
    /// Load the configuration of `tag` from the environment's home.
    pub fn load(env: &Environment, tag: &str) -> Result<Self, ConfigError> {
        Self::load_from(&env.tag_file(tag), tag)
    }

    /// Load a TAG configuration from a specific path.
    ///
    /// Unlike the application settings of other tools there is no useful
    /// default TAG, so a missing file is [`ConfigError::NotFound`].
    pub fn load_from(path: &Path, tag: &str) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ini = Ini::load_from_file(path)?;
        let config = super::parser::parse_ini(tag, &ini)?;
        tracing::debug!(tag, path = %path.display(), "Loaded TAG configuration");
        Ok(config)
    }

    /// Save to `<home>/<TAG>/<TAG>.tag`.
    pub fn save(&self, env: &Environment) -> Result<(), ConfigError> {
        self.save_to(&env.tag_file(&self.tag))
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::DirectoryError)?;
        }

        let content = super::writer::to_tag_string(self);
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    /// True if `tag` has a configuration file.
    pub fn exists(env: &Environment, tag: &str) -> bool {
        env.tag_file(tag).is_file()
    }
}
