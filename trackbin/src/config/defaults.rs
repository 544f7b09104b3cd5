//! Default values and naming constants for TAG configuration.

use crate::database::Endianness;
use crate::grid::Region;

/// Environment variable overriding the home directory.
pub const HOME_ENV_VAR: &str = "TRACKBIN_HOME";

/// Home directory name under the user's home (`~/.trackbin`).
pub const HOME_DIR_NAME: &str = ".trackbin";

/// Extension of TAG configuration files.
pub const TAG_FILE_EXTENSION: &str = "tag";

/// Extension of format definition files.
pub const DEFINITION_EXTENSION: &str = "def";

/// Suffix appended to the TAG name for the track registry file.
pub const REGISTRY_FILE_SUFFIX: &str = "_tracks.d";

/// Suffix appended to the TAG name for the bin index file.
pub const INDEX_FILE_SUFFIX: &str = "_index.b";

/// Directory (under home) for log files.
pub const LOG_DIR_NAME: &str = "logs";

/// Log file name.
pub const LOG_FILE_NAME: &str = "trackbin.log";

/// Default bin size in both directions.
pub const DEFAULT_BIN_INC: f64 = 1.0;

/// Default grid domain: the whole globe, 0-360.
pub fn default_region() -> Region {
    Region::global()
}

/// Default byte order of the bin index file.
pub fn default_byte_order() -> Endianness {
    Endianness::native()
}
