//! Add command - bin decoded track tables into a TAG database.

use std::path::{Path, PathBuf};

use tracing::info;
use trackbin::ingest::{parse_table, TrackBinner};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the add command.
pub fn run(
    runner: &CliRunner,
    tag_name: &str,
    files: &[PathBuf],
    fill_gaps: bool,
) -> Result<(), CliError> {
    runner.log_startup("add");
    let tag = runner.open_tag(tag_name)?;
    let mut db = runner.open_database(&tag, false)?;

    let binner = TrackBinner::new(tag.descriptor(), tag.grid())?.with_gap_fill(fill_gaps);
    let header_lines = tag.descriptor().header_lines();

    let mut skipped_total = 0usize;
    for path in files {
        let text = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
            path: path.clone(),
            error,
        })?;
        let name = track_name(path);
        let rows = parse_table(&text, header_lines);
        let report = binner.bin_track(&mut db, &name, &rows)?;
        skipped_total += report.skipped;

        println!(
            "{}: {} rows in {} bins ({} skipped)",
            name, report.rows, report.bins, report.skipped
        );
    }

    tag.store_database(runner.env(), &db)?;

    let stats = db.stats();
    info!(
        tag = tag_name,
        tracks = stats.tracks,
        bins = stats.occupied_bins,
        skipped = skipped_total,
        "Database updated"
    );
    println!(
        "TAG {}: {} tracks, {} occupied bins",
        tag_name, stats.tracks, stats.occupied_bins
    );
    Ok(())
}

/// Track name: the file name without its extension.
fn track_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_name_strips_directory_and_extension() {
        assert_eq!(track_name(Path::new("/data/cruise/leg01.xyz")), "leg01");
        assert_eq!(track_name(Path::new("leg02")), "leg02");
    }
}
