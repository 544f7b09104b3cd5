//! Common types and utilities shared across CLI commands.

use std::io::{self, BufWriter, Stdout, Write};

use trackbin::grid::Region;

use crate::error::CliError;

/// Parse a `west/east/south/north` argument.
pub fn parse_region(value: &str) -> Result<Region, CliError> {
    value
        .parse::<Region>()
        .map_err(|e| CliError::InvalidArgument(format!("region '{}': {}", value, e)))
}

/// Buffered stdout for result listings.
pub fn output() -> BufWriter<Stdout> {
    BufWriter::new(io::stdout())
}

/// Write one output line.
pub fn emit<W: Write>(out: &mut W, line: impl std::fmt::Display) -> Result<(), CliError> {
    writeln!(out, "{}", line).map_err(CliError::Output)
}

/// Flush buffered output.
pub fn finish<W: Write>(mut out: W) -> Result<(), CliError> {
    out.flush().map_err(CliError::Output)
}
