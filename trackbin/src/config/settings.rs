//! Settings struct for a TAG configuration file.
//!
//! Each field group mirrors one `[section]` of the INI file. This is pure
//! data; parsing and serialization live in sibling modules.

use std::path::PathBuf;

use super::defaults::{default_byte_order, default_region, DEFAULT_BIN_INC};
use crate::database::Endianness;
use crate::grid::{BinGrid, GridError, Region};

/// Configuration of one data system.
#[derive(Debug, Clone, PartialEq)]
pub struct TagConfig {
    /// TAG name (not stored in the file; taken from its location)
    pub tag: String,
    /// `[tag] format` - name of the format definition
    pub format: String,
    /// `[tag] suffix` - track file extension, without the dot
    pub suffix: Option<String>,
    /// `[grid] region` - bin grid domain
    pub region: Region,
    /// `[grid] inc` - bin size as `(dx, dy)`
    pub increment: (f64, f64),
    /// `[index] byte_order` - byte order of the bin index file
    pub byte_order: Endianness,
    /// `[paths] data` - directories searched for track files
    pub data_paths: Vec<PathBuf>,
}

impl TagConfig {
    /// A configuration with the default global 1°×1° grid.
    pub fn new(tag: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            format: format.into(),
            suffix: None,
            region: default_region(),
            increment: (DEFAULT_BIN_INC, DEFAULT_BIN_INC),
            byte_order: default_byte_order(),
            data_paths: Vec::new(),
        }
    }

    /// Build the bin grid this TAG indexes with.
    pub fn grid(&self, geographic: bool) -> Result<BinGrid, GridError> {
        BinGrid::new(self.region, self.increment.0, self.increment.1, geographic)
    }

    /// True when a bin index written under `other` reads back correctly
    /// under `self`: same domain, increment and byte order.
    pub fn same_binning(&self, other: &TagConfig) -> bool {
        self.region == other.region
            && self.increment == other.increment
            && self.byte_order == other.byte_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_binning_ignores_descriptive_fields() {
        let base = TagConfig::new("MGD77", "mgd77");
        let mut other = base.clone();
        other.format = "mgd77t".to_string();
        other.suffix = Some("m77t".to_string());
        other.data_paths.push(PathBuf::from("/data"));
        assert!(base.same_binning(&other));
    }

    #[test]
    fn test_same_binning_detects_grid_changes() {
        let base = TagConfig::new("MGD77", "mgd77");

        let mut finer = base.clone();
        finer.increment = (0.5, 0.5);
        assert!(!base.same_binning(&finer));

        let mut shifted = base.clone();
        shifted.region = Region::new(-180.0, 180.0, -90.0, 90.0).unwrap();
        assert!(!base.same_binning(&shifted));

        let mut swapped = base.clone();
        swapped.byte_order = base.byte_order.swapped();
        assert!(!base.same_binning(&swapped));
    }
}
