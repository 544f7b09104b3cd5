//! Track database: the per-TAG registry of tracks plus the sparse bin index.
//!
//! Two files live in `<home>/<TAG>/`:
//!
//! - `<TAG>_tracks.d` - text registry (`name<TAB>id<TAB>flags`)
//! - `<TAG>_index.b` - binary bin index of 32-bit integers
//!
//! Both are read fully into memory on open. The database is built once by
//! ingestion, stored, and then only read by queries and the pair generator.
//! There is no file locking; a writer must not run against the same TAG as a
//! reader.
//!
//! # Example
//!
//! ```
//! use trackbin::database::TrackDatabase;
//!
//! let mut db = TrackDatabase::new("DEMO");
//! let id = db.register_track("leg1").unwrap();
//! db.add_to_bin(12, id, 0b11).unwrap();
//! assert_eq!(db.tracks_in_bin(12)[0].track_id, id);
//! assert!(db.tracks_in_bin(13).is_empty());
//! ```

mod bin_index;
mod codec;
mod error;
mod registry;

pub use bin_index::{BinIndex, BinTrack};
pub use codec::Endianness;
pub use error::DatabaseError;
pub use registry::{TrackRecord, TrackRegistry};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Environment;

/// Counts reported by `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabaseStats {
    pub tracks: usize,
    pub occupied_bins: usize,
    pub entries: usize,
}

/// Registry and bin index of one TAG.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackDatabase {
    tag: String,
    registry: TrackRegistry,
    index: BinIndex,
}

impl TrackDatabase {
    /// An empty database for `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn index(&self) -> &BinIndex {
        &self.index
    }

    // ===== Updates =====

    /// Register a track, returning its id. Idempotent.
    pub fn register_track(&mut self, name: &str) -> Result<u32, DatabaseError> {
        self.registry.register(name)
    }

    /// OR `mask` into the track's global flags.
    pub fn set_global_flags(&mut self, id: u32, mask: u32) -> Result<(), DatabaseError> {
        self.registry.set_global_flags(id, mask)
    }

    /// Record that track `id` crosses `bin` with columns `local_flags`.
    pub fn add_to_bin(&mut self, bin: u32, id: u32, local_flags: u32) -> Result<(), DatabaseError> {
        if self.registry.get(id).is_none() {
            return Err(DatabaseError::UnknownTrack(id));
        }
        self.index.add(bin, id, local_flags);
        Ok(())
    }

    // ===== Lookups =====

    pub fn tracks_in_bin(&self, bin: u32) -> &[BinTrack] {
        self.index.tracks_in_bin(bin)
    }

    pub fn track(&self, id: u32) -> Option<&TrackRecord> {
        self.registry.get(id)
    }

    pub fn track_id(&self, name: &str) -> Option<u32> {
        self.registry.id_of(name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TrackRecord> {
        self.registry.iter()
    }

    pub fn track_count(&self) -> usize {
        self.registry.len()
    }

    pub fn occupied_bins(&self) -> impl Iterator<Item = u32> + '_ {
        self.index.occupied_bins()
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            tracks: self.registry.len(),
            occupied_bins: self.index.occupied_count(),
            entries: self.index.entry_count(),
        }
    }

    /// Fail with `CorruptIndex` if any occupied bin is `>= n_bins`.
    pub fn validate_bins(&self, n_bins: u32) -> Result<(), DatabaseError> {
        match self.index.max_bin() {
            Some(max) if max >= n_bins => Err(DatabaseError::corrupt(format!(
                "bin {} is outside the {}-bin grid of TAG {}",
                max, n_bins, self.tag
            ))),
            _ => Ok(()),
        }
    }

    // ===== Persistence =====

    /// Load a database from explicit file paths.
    pub fn load(
        tag: &str,
        registry_path: &Path,
        index_path: &Path,
        order: Endianness,
    ) -> Result<Self, DatabaseError> {
        if !registry_path.is_file() {
            return Err(DatabaseError::NotFound(registry_path.to_path_buf()));
        }
        if !index_path.is_file() {
            return Err(DatabaseError::corrupt(format!(
                "registry {} has no bin index {}",
                registry_path.display(),
                index_path.display()
            )));
        }

        let (registry, header_tag) =
            TrackRegistry::read_from(BufReader::new(File::open(registry_path)?))?;
        if let Some(header_tag) = header_tag.filter(|t| t != tag) {
            warn!(
                tag,
                header = %header_tag,
                path = %registry_path.display(),
                "Registry header names a different TAG"
            );
        }

        let index = BinIndex::read_from(
            BufReader::new(File::open(index_path)?),
            order,
            registry.len(),
        )?;

        debug!(
            tag,
            tracks = registry.len(),
            bins = index.occupied_count(),
            byte_order = %order,
            "Loaded track database"
        );

        Ok(Self {
            tag: tag.to_string(),
            registry,
            index,
        })
    }

    /// Write both files, creating the parent directories.
    pub fn save(
        &self,
        registry_path: &Path,
        index_path: &Path,
        order: Endianness,
    ) -> Result<(), DatabaseError> {
        for path in [registry_path, index_path] {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(registry_path)?);
        self.registry.write_to(&mut writer, &self.tag)?;
        writer.flush()?;

        let mut writer = BufWriter::new(File::create(index_path)?);
        self.index.write_to(&mut writer, order)?;
        writer.flush()?;

        info!(
            tag = %self.tag,
            tracks = self.registry.len(),
            bins = self.index.occupied_count(),
            byte_order = %order,
            "Saved track database"
        );
        Ok(())
    }

    /// Open the database of `tag` from its conventional files.
    ///
    /// A TAG with neither file yet opens as an empty database; one file
    /// without the other is `CorruptIndex`. Bins beyond `n_bins` are
    /// `CorruptIndex` as well.
    pub fn open(
        env: &Environment,
        tag: &str,
        n_bins: u32,
        order: Endianness,
    ) -> Result<Self, DatabaseError> {
        let registry_path = env.registry_path(tag);
        let index_path = env.index_path(tag);

        match (registry_path.is_file(), index_path.is_file()) {
            (false, false) => {
                debug!(tag, "No track database yet, starting empty");
                return Ok(Self::new(tag));
            }
            (false, true) => {
                return Err(DatabaseError::corrupt(format!(
                    "bin index {} has no registry {}",
                    index_path.display(),
                    registry_path.display()
                )));
            }
            _ => {}
        }

        let db = Self::load(tag, &registry_path, &index_path, order)?;
        db.validate_bins(n_bins)?;
        Ok(db)
    }

    /// Store to the TAG's conventional files.
    pub fn store(&self, env: &Environment, order: Endianness) -> Result<(), DatabaseError> {
        self.save(
            &env.registry_path(&self.tag),
            &env.index_path(&self.tag),
            order,
        )
    }
}
