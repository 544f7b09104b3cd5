//! TAG configuration and the process environment.
//!
//! Every data system is identified by a TAG. Its settings live in
//! `<home>/<TAG>/<TAG>.tag`, an INI file naming the format definition, the
//! bin grid, the byte order of the bin index file and the data search
//! paths. The home directory is carried by an explicit [`Environment`]
//! value rather than process-wide state.
//!
//! Settings structs live in [`settings`], constants in [`defaults`],
//! parsing in `parser`, and serialization in `writer`.
//!
//! # Example
//!
//! ```
//! use trackbin::config::{Environment, TagConfig};
//!
//! let env = Environment::new("/data/trackbin");
//! let config = TagConfig::new("MGD77", "mgd77");
//! assert_eq!(env.tag_file(&config.tag), std::path::Path::new("/data/trackbin/MGD77/MGD77.tag"));
//! ```

pub mod defaults;
mod environment;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use environment::{default_home, Environment};
pub use file::ConfigError;
pub use parser::parse_increment;
pub use settings::TagConfig;
