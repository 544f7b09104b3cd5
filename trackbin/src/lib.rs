//! trackbin - bin-indexed track database for crossover analysis
//!
//! This library organizes survey tracks into a spatial bin index so that two
//! questions can be answered without touching the raw track files:
//!
//! - which tracks cover a region and carry given columns ([`query`])
//! - which pairs of tracks share a bin and must be checked for crossovers
//!   ([`pairs`])
//!
//! # High-Level API
//!
//! A [`tag::Tag`] resolves a data system's configuration, format descriptor
//! and bin grid together:
//!
//! ```ignore
//! use trackbin::config::Environment;
//! use trackbin::pairs::PairGenerator;
//! use trackbin::tag::Tag;
//!
//! let env = Environment::from_env();
//! let tag = Tag::open(&env, "MGD77")?;
//! let db = tag.open_database(&env)?;
//!
//! for pair in PairGenerator::new(&db).generate() {
//!     println!("{}", pair);
//! }
//! ```

pub mod config;
pub mod database;
pub mod format;
pub mod grid;
pub mod ingest;
pub mod logging;
pub mod pairs;
pub mod query;
pub mod tag;

/// Version of the trackbin library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
