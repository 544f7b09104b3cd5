//! Home directory and file naming conventions.

use std::path::{Path, PathBuf};

use super::defaults::{
    DEFINITION_EXTENSION, HOME_DIR_NAME, HOME_ENV_VAR, INDEX_FILE_SUFFIX, LOG_DIR_NAME,
    REGISTRY_FILE_SUFFIX, TAG_FILE_EXTENSION,
};

/// Where TAG configurations and databases live.
///
/// Constructed once per process invocation and passed to every load/open
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    home: PathBuf,
}

impl Environment {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolve the home from `TRACKBIN_HOME`, falling back to `~/.trackbin`.
    pub fn from_env() -> Self {
        let home = std::env::var_os(HOME_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_home);
        Self::new(home)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding one TAG's configuration and database.
    pub fn tag_dir(&self, tag: &str) -> PathBuf {
        self.home.join(tag)
    }

    /// `<home>/<TAG>/<TAG>.tag`
    pub fn tag_file(&self, tag: &str) -> PathBuf {
        self.tag_dir(tag)
            .join(format!("{}.{}", tag, TAG_FILE_EXTENSION))
    }

    /// Shared location of a format definition: `<home>/<format>.def`.
    pub fn definition_path(&self, format: &str) -> PathBuf {
        self.home.join(format!("{}.{}", format, DEFINITION_EXTENSION))
    }

    /// Locate a format definition, preferring a TAG-local copy.
    pub fn find_definition(&self, tag: &str, format: &str) -> Option<PathBuf> {
        let local = self
            .tag_dir(tag)
            .join(format!("{}.{}", format, DEFINITION_EXTENSION));
        [local, self.definition_path(format)]
            .into_iter()
            .find(|p| p.is_file())
    }

    /// Track registry: `<home>/<TAG>/<TAG>_tracks.d`
    pub fn registry_path(&self, tag: &str) -> PathBuf {
        self.tag_dir(tag)
            .join(format!("{}{}", tag, REGISTRY_FILE_SUFFIX))
    }

    /// Bin index: `<home>/<TAG>/<TAG>_index.b`
    pub fn index_path(&self, tag: &str) -> PathBuf {
        self.tag_dir(tag).join(format!("{}{}", tag, INDEX_FILE_SUFFIX))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home.join(LOG_DIR_NAME)
    }
}

/// Default home directory (`~/.trackbin`).
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME_DIR_NAME)
}
