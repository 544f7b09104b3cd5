//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use trackbin::config::ConfigError;
use trackbin::database::DatabaseError;
use trackbin::format::FormatError;
use trackbin::ingest::IngestError;
use trackbin::pairs::PairError;
use trackbin::query::QueryError;
use trackbin::tag::TagError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Bad command-line value
    InvalidArgument(String),
    /// TAG configuration already present
    TagExists { tag: String, path: PathBuf },
    /// Re-initialising would change the grid under an existing database
    BinningChanged { tag: String, path: PathBuf },
    /// TAG configuration error
    Config(ConfigError),
    /// TAG could not be resolved
    Tag(TagError),
    /// Column list or definition error
    Format(FormatError),
    /// Track database error
    Database(DatabaseError),
    /// Binning a track failed
    Ingest(IngestError),
    /// Pairing run failed
    Pairs(PairError),
    /// Query failed
    Query(QueryError),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Failed to write output
    Output(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Tag(TagError::Format(FormatError::ConfigNotFound(path))) => {
                eprintln!();
                eprintln!("Looked for: {}", path.display());
                eprintln!("Create a TAG with:");
                eprintln!("  trackbin init <TAG> --format <name> --definition <file.def>");
                eprintln!("or point --home / TRACKBIN_HOME at an existing home directory.");
            }
            CliError::TagExists { .. } => {
                eprintln!();
                eprintln!("Use --force to overwrite the existing configuration.");
            }
            CliError::BinningChanged { .. } => {
                eprintln!();
                eprintln!("Stored bin indices only hold for the grid they were built on.");
                eprintln!("Keep the original -R/-I/--byte-order, or remove the TAG's");
                eprintln!("_tracks.d and _index.b files and add the tracks again.");
            }
            CliError::Tag(TagError::Database(DatabaseError::CorruptIndex(_)))
            | CliError::Database(DatabaseError::CorruptIndex(_)) => {
                eprintln!();
                eprintln!("The registry and bin index disagree. If the index was written");
                eprintln!("on a machine with a different byte order, retry with --swap.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::TagExists { tag, path } => {
                write!(f, "TAG {} already exists at {}", tag, path.display())
            }
            CliError::BinningChanged { tag, path } => write!(
                f,
                "TAG {} has a track database at {} built on a different grid",
                tag,
                path.display()
            ),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Tag(e) => write!(f, "{}", e),
            CliError::Format(e) => write!(f, "{}", e),
            CliError::Database(e) => write!(f, "{}", e),
            CliError::Ingest(e) => write!(f, "{}", e),
            CliError::Pairs(e) => write!(f, "{}", e),
            CliError::Query(e) => write!(f, "{}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Tag(e) => Some(e),
            CliError::Format(e) => Some(e),
            CliError::Database(e) => Some(e),
            CliError::Ingest(e) => Some(e),
            CliError::Pairs(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<TagError> for CliError {
    fn from(e: TagError) -> Self {
        CliError::Tag(e)
    }
}

impl From<FormatError> for CliError {
    fn from(e: FormatError) -> Self {
        CliError::Format(e)
    }
}

impl From<DatabaseError> for CliError {
    fn from(e: DatabaseError) -> Self {
        CliError::Database(e)
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        CliError::Ingest(e)
    }
}

impl From<PairError> for CliError {
    fn from(e: PairError) -> Self {
        CliError::Pairs(e)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}
