//! Integration tests for candidate-pair generation on binned tracks.
//!
//! These tests drive the full path from decoded rows through the binner to
//! the pair generator, including allow-lists loaded from disk.

use std::fs;
use tempfile::TempDir;
use trackbin::database::TrackDatabase;
use trackbin::format::FormatDescriptor;
use trackbin::grid::{BinGrid, Region};
use trackbin::ingest::TrackBinner;
use trackbin::pairs::{AllowList, PairGenerator, PairMode};

// =============================================================================
// Test Helpers
// =============================================================================

/// 10×10 domain with 5×5 bins (4 bins). A crosses bins (0,0) and (1,1),
/// B stays in (0,0), C stays in (1,1).
fn scenario() -> TrackDatabase {
    let descriptor = FormatDescriptor::parse("x d\ny d\nz f\n").unwrap();
    let grid = BinGrid::new(Region::new(0.0, 10.0, 0.0, 10.0).unwrap(), 5.0, 5.0, false).unwrap();
    let binner = TrackBinner::new(&descriptor, &grid).unwrap();

    let mut db = TrackDatabase::new("SCENARIO");
    binner
        .bin_track(&mut db, "A", &[vec![1.0, 1.0, 0.0], vec![8.0, 8.0, 0.0]])
        .unwrap();
    binner
        .bin_track(&mut db, "B", &[vec![2.0, 2.0, 0.0], vec![3.0, 1.0, 0.0]])
        .unwrap();
    binner
        .bin_track(&mut db, "C", &[vec![9.0, 9.0, 0.0]])
        .unwrap();
    db
}

fn lines(generator: &PairGenerator<'_>) -> Vec<String> {
    generator.generate().iter().map(ToString::to_string).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_tracks_sharing_a_bin_are_paired() {
    let db = scenario();
    assert_eq!(lines(&PairGenerator::new(&db)), vec!["A\tB", "A\tC"]);
}

#[test]
fn test_allow_list_file_restricts_external_pairs() {
    let db = scenario();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new_cruises.lst");
    fs::write(&path, "# new this season\nC.xyz\nunknown_leg\n").unwrap();
    let list = AllowList::load(&path).unwrap();

    let generator = PairGenerator::new(&db)
        .with_mode(PairMode::ExternalOnly)
        .with_allow_list(&list);
    assert_eq!(generator.missing(), &["unknown_leg".to_string()]);
    assert_eq!(lines(&generator), vec!["A\tC"]);

    let generator = PairGenerator::new(&db)
        .with_mode(PairMode::IncludeInternal)
        .with_allow_list(&list);
    assert_eq!(lines(&generator), vec!["A\tB", "A\tC"]);
}

#[test]
fn test_parallel_generation_matches_on_scenario() {
    let db = scenario();
    let generator = PairGenerator::new(&db);
    assert_eq!(generator.generate_parallel(), generator.generate());
}
