//! Ingestion binner: turns decoded track rows into database entries.
//!
//! Rows hold raw column values in descriptor order. Each row is placed in a
//! bin from its x/y columns; every column with a non-missing value sets its
//! bit in that bin's local flags and in the track's global flags.
//!
//! Bad rows (wrong width, missing coordinate, outside the grid) are skipped
//! with a warning and counted, so one dirty record never aborts a track.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::database::{DatabaseError, TrackDatabase};
use crate::format::FormatDescriptor;
use crate::grid::{BinGrid, FULL_CYCLE};

/// Errors that abort binning a track.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Descriptor has no x/lon or y/lat column
    #[error("Format has no {0} column; cannot bin tracks")]
    MissingCoordinateColumn(&'static str),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Outcome of binning one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinningReport {
    pub track_id: u32,
    /// Rows placed in a bin
    pub rows: usize,
    /// Rows skipped as unusable
    pub skipped: usize,
    /// Distinct bins the track touches
    pub bins: usize,
}

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
    bin: u32,
    mask: u32,
}

/// Bins tracks of one TAG.
pub struct TrackBinner<'a> {
    descriptor: &'a FormatDescriptor,
    grid: &'a BinGrid,
    x_column: usize,
    y_column: usize,
    fill_gaps: bool,
}

impl<'a> TrackBinner<'a> {
    pub fn new(descriptor: &'a FormatDescriptor, grid: &'a BinGrid) -> Result<Self, IngestError> {
        let x_column = descriptor
            .x_column()
            .ok_or(IngestError::MissingCoordinateColumn("x/lon"))?;
        let y_column = descriptor
            .y_column()
            .ok_or(IngestError::MissingCoordinateColumn("y/lat"))?;

        Ok(Self {
            descriptor,
            grid,
            x_column,
            y_column,
            fill_gaps: false,
        })
    }

    /// Also mark bins crossed between consecutive rows.
    pub fn with_gap_fill(mut self, fill_gaps: bool) -> Self {
        self.fill_gaps = fill_gaps;
        self
    }

    /// Bin the rows of track `name` into `db`.
    ///
    /// An empty row marks a segment break.
    pub fn bin_track(
        &self,
        db: &mut TrackDatabase,
        name: &str,
        rows: &[Vec<f64>],
    ) -> Result<BinningReport, IngestError> {
        let width = self.descriptor.len();
        let mut local: BTreeMap<u32, u32> = BTreeMap::new();
        let mut global = 0u32;
        let mut used = 0usize;
        let mut skipped = 0usize;
        let mut previous: Option<Point> = None;

        for (row_number, row) in rows.iter().enumerate() {
            if row.is_empty() {
                previous = None;
                continue;
            }
            if row.len() != width {
                warn!(
                    track = name,
                    row = row_number,
                    expected = width,
                    found = row.len(),
                    "Skipping row with wrong column count"
                );
                skipped += 1;
                previous = None;
                continue;
            }

            let Some((x, y)) = self.coordinates(row) else {
                debug!(track = name, row = row_number, "Skipping row without coordinates");
                skipped += 1;
                previous = None;
                continue;
            };

            let bin = match self.grid.bin_of(x, y) {
                Ok(coord) => self.grid.linear_index(coord),
                Err(e) => {
                    warn!(track = name, row = row_number, error = %e, "Skipping row outside grid");
                    skipped += 1;
                    previous = None;
                    continue;
                }
            };

            let mask = self.row_mask(row);
            *local.entry(bin).or_default() |= mask;
            global |= mask;

            let point = Point { x, y, bin, mask };
            if self.fill_gaps {
                if let Some(from) = previous {
                    self.fill_segment(&from, &point, &mut local);
                }
            }
            previous = Some(point);
            used += 1;
        }

        let track_id = db.register_track(name)?;
        db.set_global_flags(track_id, global)?;
        for (&bin, &flags) in &local {
            db.add_to_bin(bin, track_id, flags)?;
        }

        if used == 0 {
            warn!(track = name, skipped, "No usable rows in track");
        } else {
            info!(
                track = name,
                track_id,
                rows = used,
                skipped,
                bins = local.len(),
                columns = ?self.descriptor.column_names(global),
                "Binned track"
            );
        }

        Ok(BinningReport {
            track_id,
            rows: used,
            skipped,
            bins: local.len(),
        })
    }

    /// Scaled x/y of a row, or None when either is missing.
    fn coordinates(&self, row: &[f64]) -> Option<(f64, f64)> {
        let fields = self.descriptor.fields();
        let (x_field, y_field) = (&fields[self.x_column], &fields[self.y_column]);
        let (raw_x, raw_y) = (row[self.x_column], row[self.y_column]);
        if x_field.is_missing(raw_x) || y_field.is_missing(raw_y) {
            return None;
        }

        let mut x = x_field.apply(raw_x);
        let y = y_field.apply(raw_y);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        if self.descriptor.is_geographic() {
            x = self.into_domain(self.descriptor.longitude_convention().normalize(x));
        }
        Some((x, y))
    }

    /// Shift a longitude by one cycle if that lands it inside the domain.
    fn into_domain(&self, x: f64) -> f64 {
        let domain = self.grid.domain();
        if x < domain.west && x + FULL_CYCLE <= domain.east {
            x + FULL_CYCLE
        } else if x > domain.east && x - FULL_CYCLE >= domain.west {
            x - FULL_CYCLE
        } else {
            x
        }
    }

    fn row_mask(&self, row: &[f64]) -> u32 {
        self.descriptor
            .fields()
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(_, (field, raw))| !field.is_missing(**raw))
            .fold(0, |mask, (i, _)| mask | (1u32 << i))
    }

    /// Mark bins strictly between two consecutive points.
    fn fill_segment(&self, from: &Point, to: &Point, local: &mut BTreeMap<u32, u32>) {
        if from.bin == to.bin {
            return;
        }

        let mut x1 = to.x;
        if self.descriptor.is_geographic() {
            let delta = x1 - from.x;
            if delta > FULL_CYCLE / 2.0 {
                x1 -= FULL_CYCLE;
            } else if delta < -FULL_CYCLE / 2.0 {
                x1 += FULL_CYCLE;
            }
        }

        let (dx, dy) = self.grid.increment();
        let span = ((x1 - from.x).abs() / dx).max((to.y - from.y).abs() / dy);
        // Four samples per cell crossed
        let steps = (span * 4.0).ceil() as usize;
        let mask = from.mask & to.mask;

        for k in 1..steps {
            let t = k as f64 / steps as f64;
            let mut x = from.x + t * (x1 - from.x);
            let y = from.y + t * (to.y - from.y);
            if self.descriptor.is_geographic() {
                x = self.into_domain(x);
            }
            if let Ok(coord) = self.grid.bin_of(x, y) {
                let bin = self.grid.linear_index(coord);
                if bin != from.bin && bin != to.bin {
                    *local.entry(bin).or_default() |= mask;
                }
            }
        }
    }
}

/// Parse a decoded column table.
///
/// One row per line, whitespace-separated numbers (`NaN` allowed). The
/// first `header_lines` lines are skipped, as are blank and `#` lines. A
/// line starting with `>` is a segment break and yields an empty row. Lines
/// with non-numeric tokens are skipped with a warning.
pub fn parse_table(text: &str, header_lines: usize) -> Vec<Vec<f64>> {
    let mut rows = Vec::new();

    for (number, line) in text.lines().enumerate().skip(header_lines) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('>') {
            rows.push(Vec::new());
            continue;
        }

        match line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(row) => rows.push(row),
            Err(e) => warn!(line = number + 1, error = %e, "Skipping non-numeric table line"),
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Region;

    fn plain_grid(size: f64, inc: f64) -> BinGrid {
        BinGrid::new(Region::new(0.0, size, 0.0, size).unwrap(), inc, inc, false).unwrap()
    }

    fn survey_descriptor() -> FormatDescriptor {
        FormatDescriptor::parse("lon d\nlat d\ndepth f Y 1 0 -9999\nmag f\n").unwrap()
    }

    // ===== Flags =====

    #[test]
    fn test_missing_column_never_sets_its_bit() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 5.0);
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        let mut db = TrackDatabase::new("T");

        let rows = vec![
            vec![1.5, 1.5, -9999.0, 40.0],
            vec![6.5, 6.5, -9999.0, 41.0],
        ];
        let report = binner.bin_track(&mut db, "survey", &rows).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.bins, 2);
        let flags = db.track(report.track_id).unwrap().global_flags;
        assert_eq!(flags & 0b1000, 0b1000);
        assert_eq!(flags & 0b0100, 0);
        for bin in [0, 3] {
            assert_eq!(db.tracks_in_bin(bin)[0].local_flags, 0b1011);
        }
    }

    #[test]
    fn test_local_flags_are_per_bin() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 5.0);
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        let mut db = TrackDatabase::new("T");

        let rows = vec![
            vec![1.0, 1.0, 100.0, f64::NAN],
            vec![9.0, 1.0, -9999.0, 3.0],
        ];
        let report = binner.bin_track(&mut db, "t", &rows).unwrap();

        assert_eq!(db.track(report.track_id).unwrap().global_flags, 0b1111);
        assert_eq!(db.tracks_in_bin(0)[0].local_flags, 0b0111);
        assert_eq!(db.tracks_in_bin(1)[0].local_flags, 0b1011);
    }

    // ===== Skipped rows =====

    #[test]
    fn test_bad_rows_are_skipped_and_counted() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 5.0);
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        let mut db = TrackDatabase::new("T");

        let rows = vec![
            vec![20.0, 1.0, 1.0, 1.0],     // outside the grid
            vec![f64::NAN, 1.0, 1.0, 1.0], // missing x
            vec![1.0, 1.0],                // short row
            vec![2.0, 2.0, 1.0, 1.0],
        ];
        let report = binner.bin_track(&mut db, "dirty", &rows).unwrap();

        assert_eq!(report.rows, 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(db.occupied_bins().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_track_without_usable_rows_is_still_registered() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 5.0);
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        let mut db = TrackDatabase::new("T");

        let report = binner
            .bin_track(&mut db, "empty", &[vec![50.0, 50.0, 1.0, 1.0]])
            .unwrap();
        assert_eq!(report.bins, 0);
        assert_eq!(db.track_id("empty"), Some(report.track_id));
        assert_eq!(db.track(report.track_id).unwrap().global_flags, 0);
    }

    #[test]
    fn test_descriptor_without_coordinates_rejected() {
        let descriptor = FormatDescriptor::parse("depth f\n").unwrap();
        let grid = plain_grid(10.0, 5.0);
        assert!(matches!(
            TrackBinner::new(&descriptor, &grid),
            Err(IngestError::MissingCoordinateColumn(_))
        ));
    }

    // ===== Longitudes =====

    #[test]
    fn test_longitude_shifted_into_domain() {
        let descriptor = FormatDescriptor::parse("#GEO\n#LON 0-360\nlon d\nlat d\n").unwrap();
        let grid = BinGrid::new(Region::new(-20.0, 40.0, -10.0, 30.0).unwrap(), 10.0, 10.0, true)
            .unwrap();
        let binner = TrackBinner::new(&descriptor, &grid).unwrap();
        let mut db = TrackDatabase::new("G");

        let report = binner
            .bin_track(&mut db, "west", &[vec![-15.0, 5.0], vec![345.0, 5.0]])
            .unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(report.bins, 1);
    }

    // ===== Gap fill =====

    #[test]
    fn test_gap_fill_marks_crossed_bins() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 1.0);
        let rows = vec![vec![0.5, 0.5, 1.0, 1.0], vec![5.5, 0.5, -9999.0, 1.0]];

        let mut db = TrackDatabase::new("T");
        let report = TrackBinner::new(&descriptor, &grid)
            .unwrap()
            .bin_track(&mut db, "sparse", &rows)
            .unwrap();
        assert_eq!(report.bins, 2);

        let mut db = TrackDatabase::new("T");
        let report = TrackBinner::new(&descriptor, &grid)
            .unwrap()
            .with_gap_fill(true)
            .bin_track(&mut db, "filled", &rows)
            .unwrap();
        assert_eq!(report.bins, 6);
        // Intermediate bins carry only columns present at both ends
        assert_eq!(db.tracks_in_bin(3)[0].local_flags, 0b1011);
    }

    #[test]
    fn test_gap_fill_crosses_dateline_short_way() {
        let descriptor = FormatDescriptor::parse("#GEO\n#LON 0-360\nlon d\nlat d\n").unwrap();
        let grid = BinGrid::new(Region::global(), 1.0, 1.0, true).unwrap();
        let mut db = TrackDatabase::new("G");

        let report = TrackBinner::new(&descriptor, &grid)
            .unwrap()
            .with_gap_fill(true)
            .bin_track(&mut db, "dateline", &[vec![359.5, 0.5], vec![1.5, 0.5]])
            .unwrap();

        assert_eq!(report.bins, 3);
        let row = 90 * 360;
        assert_eq!(
            db.occupied_bins().collect::<Vec<_>>(),
            vec![row, row + 1, row + 359]
        );
    }

    #[test]
    fn test_segment_break_stops_gap_fill() {
        let descriptor = survey_descriptor();
        let grid = plain_grid(10.0, 1.0);
        let rows = vec![
            vec![0.5, 0.5, 1.0, 1.0],
            Vec::new(),
            vec![5.5, 0.5, 1.0, 1.0],
        ];
        let mut db = TrackDatabase::new("T");
        let report = TrackBinner::new(&descriptor, &grid)
            .unwrap()
            .with_gap_fill(true)
            .bin_track(&mut db, "split", &rows)
            .unwrap();
        assert_eq!(report.bins, 2);
        assert_eq!(report.skipped, 0);
    }

    // ===== Tables =====

    #[test]
    fn test_parse_table() {
        let text = "lon lat z\n# comment\n1 2 3\n\n> segment\n4 5 NaN\n7 x 9\n";
        let rows = parse_table(text, 1);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![1.0, 2.0, 3.0]);
        assert!(rows[1].is_empty());
        assert!(rows[2][2].is_nan());
    }
}
