use super::*;
use crate::database::TrackDatabase;
use crate::format::FormatDescriptor;
use crate::grid::{BinCoordinate, BinGrid, Region};
use crate::ingest::TrackBinner;

const SURVEY_FORMAT: &str = "lon d\nlat d\ndepth f Y 1 0 -9999\nmag f\n";

struct Fixture {
    descriptor: FormatDescriptor,
    grid: BinGrid,
    db: TrackDatabase,
}

/// 10×10 domain with 5×5 bins:
///
/// - `magonly`: depth always missing, mag everywhere, bins 0 and 3
/// - `both`: depth and mag everywhere, bin 0
/// - `mixed`: depth only in bin 1, mag only in bin 2
fn fixture() -> Fixture {
    let descriptor = FormatDescriptor::parse(SURVEY_FORMAT).unwrap();
    let grid = BinGrid::new(Region::new(0.0, 10.0, 0.0, 10.0).unwrap(), 5.0, 5.0, false).unwrap();
    let mut db = TrackDatabase::new("SURVEY");

    {
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        binner
            .bin_track(
                &mut db,
                "magonly",
                &[vec![1.0, 1.0, -9999.0, 50.0], vec![7.0, 7.0, -9999.0, 51.0]],
            )
            .unwrap();
        binner
            .bin_track(&mut db, "both", &[vec![2.0, 2.0, 3000.0, 48.0]])
            .unwrap();
        binner
            .bin_track(
                &mut db,
                "mixed",
                &[vec![7.0, 1.0, 4000.0, f64::NAN], vec![1.0, 7.0, -9999.0, 2.0]],
            )
            .unwrap();
    }

    Fixture {
        descriptor,
        grid,
        db,
    }
}

fn names(summaries: &[TrackSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.name.as_str()).collect()
}

// ===== Track mode =====

#[test]
fn test_must_have_mag_must_lack_depth() {
    let f = fixture();
    let filter = ColumnFilter::from_lists(&f.descriptor, "mag", "depth").unwrap();
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &filter, None);
    assert_eq!(names(&found), vec!["magonly"]);
}

#[test]
fn test_must_have_depth_excludes_track_without_depth() {
    let f = fixture();
    let filter = ColumnFilter::from_lists(&f.descriptor, "depth", "").unwrap();
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &filter, None);
    assert_eq!(names(&found), vec!["both", "mixed"]);
}

#[test]
fn test_no_constraints_lists_all_tracks_by_id() {
    let f = fixture();
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &ColumnFilter::default(), None);
    assert_eq!(names(&found), vec!["magonly", "both", "mixed"]);
    assert_eq!(found[0].id, 0);
}

#[test]
fn test_presence_per_column() {
    let f = fixture();
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &ColumnFilter::default(), None);
    let magonly = &found[0];

    let presence: Vec<(&str, bool)> = magonly
        .presence
        .iter()
        .map(|p| (p.name.as_str(), p.present))
        .collect();
    assert_eq!(
        presence,
        vec![("lon", true), ("lat", true), ("depth", false), ("mag", true)]
    );
}

#[test]
fn test_must_lack_only_checks_scanned_bins() {
    let f = fixture();
    let filter = ColumnFilter::from_lists(&f.descriptor, "", "depth").unwrap();

    // Whole grid: mixed has depth in bin 1
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &filter, None);
    assert_eq!(names(&found), vec!["magonly"]);

    // Upper-left quadrant (bin 2): mixed lacks depth there
    let region = Region::new(0.0, 4.0, 6.0, 9.0).unwrap();
    let found = query_by_columns(&f.db, &f.descriptor, &f.grid, &filter, Some(&region));
    assert_eq!(names(&found), vec!["mixed"]);
}

#[test]
fn test_region_reports_only_tracks_seen_there() {
    let f = fixture();
    let region = Region::new(6.0, 9.0, 6.0, 9.0).unwrap();
    let found = query_by_columns(
        &f.db,
        &f.descriptor,
        &f.grid,
        &ColumnFilter::default(),
        Some(&region),
    );
    assert_eq!(names(&found), vec!["magonly"]);
}

#[test]
fn test_region_outside_grid_is_empty_success() {
    let f = fixture();
    let region = Region::new(50.0, 60.0, 50.0, 60.0).unwrap();
    let found = query_by_columns(
        &f.db,
        &f.descriptor,
        &f.grid,
        &ColumnFilter::default(),
        Some(&region),
    );
    assert!(found.is_empty());
}

#[test]
fn test_empty_database() {
    let f = fixture();
    let empty = TrackDatabase::new("EMPTY");
    let found = query_by_columns(&empty, &f.descriptor, &f.grid, &ColumnFilter::default(), None);
    assert!(found.is_empty());
}

// ===== Bin mode =====

#[test]
fn test_bins_with_mag_and_no_depth() {
    let f = fixture();
    let filter = ColumnFilter::from_lists(&f.descriptor, "mag", "depth").unwrap();
    let hits = query_bins(&f.db, &f.grid, &filter, None).unwrap();

    // Bin 0: magonly qualifies (both does not); bin 2: mixed; bin 3: magonly
    let indices: Vec<u32> = hits.iter().map(|h| h.index).collect();
    assert_eq!(indices, vec![0, 2, 3]);

    assert_eq!(hits[0].tracks, vec![0]);
    assert_eq!(hits[1].coord, BinCoordinate::new(0, 1));
    assert_eq!(hits[1].center, (2.5, 7.5));
    assert_eq!(hits[2].center, (7.5, 7.5));
}

#[test]
fn test_bins_within_region() {
    let f = fixture();
    let filter = ColumnFilter::from_lists(&f.descriptor, "depth", "").unwrap();
    let region = Region::new(0.0, 10.0, 0.0, 4.0).unwrap();
    let hits = query_bins(&f.db, &f.grid, &filter, Some(&region)).unwrap();

    let indices: Vec<u32> = hits.iter().map(|h| h.index).collect();
    assert_eq!(indices, vec![0, 1]);
    assert_eq!(hits[0].tracks, vec![1]);
    assert_eq!(hits[1].tracks, vec![2]);
}
