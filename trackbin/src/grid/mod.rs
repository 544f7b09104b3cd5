//! Regular spatial bin grid.
//!
//! A [`BinGrid`] divides a rectangular domain into `nx × ny` equal cells and
//! maps coordinates to cells. Geographic grids spanning a full 360° of
//! longitude are periodic: columns wrap around instead of falling off the
//! east or west edge.
//!
//! # Edge policy
//!
//! Binning is closed-open (`[west, west + dx)`) except at the outer
//! boundary: a point exactly on the north edge belongs to the last row, and
//! on a non-periodic grid a point exactly on the east edge belongs to the
//! last column. On a periodic grid the east edge is the same meridian as the
//! west edge and wraps to column 0. Persisted indices depend on this rule.
//!
//! ```
//! use trackbin::grid::{BinGrid, Region};
//!
//! let grid = BinGrid::new(Region::new(0.0, 10.0, 0.0, 10.0).unwrap(), 5.0, 5.0, false).unwrap();
//! assert_eq!(grid.n_bins(), 4);
//!
//! let coord = grid.bin_of(10.0, 10.0).unwrap();
//! assert_eq!((coord.i, coord.j), (1, 1));
//! assert_eq!(grid.linear_index(coord), 3);
//! ```

mod types;


pub use types::{BinCoordinate, GridError, Region, FULL_CYCLE};

/// Largest bin count addressable by the 32-bit signed bin index file.
const MAX_BINS: u64 = i32::MAX as u64;

/// Relative slack allowed when checking that increments tile the domain.
const TILE_TOLERANCE: f64 = 1e-9;

/// Regular 2-D grid over a rectangular domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGrid {
    domain: Region,
    dx: f64,
    dy: f64,
    inv_dx: f64,
    inv_dy: f64,
    nx: u32,
    ny: u32,
    periodic: bool,
}

impl BinGrid {
    /// Build a grid over `domain` with cell size `dx × dy`.
    ///
    /// The grid is periodic when `geographic` is set and the domain spans
    /// a full longitude cycle.
    pub fn new(domain: Region, dx: f64, dy: f64, geographic: bool) -> Result<Self, GridError> {
        let domain = Region::new(domain.west, domain.east, domain.south, domain.north)?;

        let invalid = |reason: &str| GridError::InvalidIncrement {
            dx,
            dy,
            reason: reason.to_string(),
        };

        if !(dx.is_finite() && dy.is_finite() && dx > 0.0 && dy > 0.0) {
            return Err(invalid("increments must be positive"));
        }

        let nx = (domain.width() / dx).round();
        let ny = (domain.height() / dy).round();
        if nx < 1.0 || ny < 1.0 {
            return Err(invalid("increment is larger than the domain"));
        }
        if (nx as u64).saturating_mul(ny as u64) > MAX_BINS {
            return Err(invalid("too many bins for a 32-bit bin index"));
        }

        let grid = Self {
            domain,
            dx,
            dy,
            inv_dx: 1.0 / dx,
            inv_dy: 1.0 / dy,
            nx: nx as u32,
            ny: ny as u32,
            periodic: geographic && domain.spans_full_cycle(),
        };
        if !grid.tiles_domain() {
            tracing::warn!(
                domain = %domain,
                dx,
                dy,
                nx = grid.nx,
                ny = grid.ny,
                "Increment does not divide the domain; edge points may fall outside the grid"
            );
        }
        Ok(grid)
    }

    /// True when `nx × dx` and `ny × dy` reproduce the domain extent.
    ///
    /// Otherwise the rounded bin counts leave a sliver of the domain
    /// uncovered (or cover past its edge).
    pub fn tiles_domain(&self) -> bool {
        let fits = |extent: f64, inc: f64, n: u32| {
            let cells = extent / inc;
            (cells - f64::from(n)).abs() <= TILE_TOLERANCE * cells.max(1.0)
        };
        fits(self.domain.width(), self.dx, self.nx) && fits(self.domain.height(), self.dy, self.ny)
    }

    pub fn domain(&self) -> &Region {
        &self.domain
    }

    /// Cell size as `(dx, dy)`.
    pub fn increment(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    pub fn nx(&self) -> u32 {
        self.nx
    }

    pub fn ny(&self) -> u32 {
        self.ny
    }

    pub fn n_bins(&self) -> u32 {
        self.nx * self.ny
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Map a coordinate to its bin.
    ///
    /// Returns [`GridError::CoordinateOutOfRange`] if the point lies outside
    /// the domain after periodic adjustment. This is a hard error: it means
    /// the data and the grid disagree about the domain.
    pub fn bin_of(&self, x: f64, y: f64) -> Result<BinCoordinate, GridError> {
        let out_of_range = GridError::CoordinateOutOfRange { x, y };
        if !x.is_finite() || !y.is_finite() {
            return Err(out_of_range);
        }

        let ny = i64::from(self.ny);
        let j = if y == self.domain.north {
            ny - 1
        } else {
            ((y - self.domain.south) * self.inv_dy).floor() as i64
        };
        if j < 0 || j >= ny {
            return Err(out_of_range);
        }

        let nx = i64::from(self.nx);
        let mut i = if x == self.domain.east && !self.periodic {
            nx - 1
        } else {
            ((x - self.domain.west) * self.inv_dx).floor() as i64
        };
        if self.periodic {
            i = i.rem_euclid(nx);
        }
        if i < 0 || i >= nx {
            return Err(out_of_range);
        }

        Ok(BinCoordinate::new(i as u32, j as u32))
    }

    /// Row-major linear index `j * nx + i`.
    #[inline]
    pub fn linear_index(&self, coord: BinCoordinate) -> u32 {
        coord.j * self.nx + coord.i
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    pub fn bin_coordinate(&self, index: u32) -> Result<BinCoordinate, GridError> {
        if index >= self.n_bins() {
            return Err(GridError::BinOutOfRange {
                index,
                n_bins: self.n_bins(),
            });
        }
        Ok(BinCoordinate::new(index % self.nx, index / self.nx))
    }

    /// Center of a bin in domain coordinates.
    pub fn bin_center(&self, coord: BinCoordinate) -> (f64, f64) {
        (
            self.domain.west + (f64::from(coord.i) + 0.5) * self.dx,
            self.domain.south + (f64::from(coord.j) + 0.5) * self.dy,
        )
    }

    /// Linear indices of every bin overlapping `region`, ascending.
    ///
    /// Parts of the region outside the domain are ignored; on a periodic
    /// grid longitudes wrap so a region may straddle the domain seam.
    pub fn bins_in_region(&self, region: &Region) -> Vec<u32> {
        let Some((j0, j1)) =
            Self::span(region.south, region.north, self.domain.south, self.inv_dy, self.ny)
        else {
            return Vec::new();
        };

        let columns: Vec<u32> = if self.periodic {
            let cycle = self.domain.width();
            if region.width() >= cycle {
                (0..self.nx).collect()
            } else {
                // Reduce the west edge into the first cycle so both ends stay small
                let west = (region.west - self.domain.west).rem_euclid(cycle);
                let nx = i64::from(self.nx);
                let first = (west * self.inv_dx).floor() as i64;
                let last = last_cell((west + region.width()) * self.inv_dx).max(first);
                let mut cols: Vec<u32> = (first..=last).map(|i| i.rem_euclid(nx) as u32).collect();
                cols.sort_unstable();
                cols.dedup();
                cols
            }
        } else {
            match Self::span(region.west, region.east, self.domain.west, self.inv_dx, self.nx) {
                Some((i0, i1)) => (i0..=i1).collect(),
                None => return Vec::new(),
            }
        };

        let mut bins = Vec::with_capacity(columns.len() * (j1 - j0 + 1) as usize);
        for j in j0..=j1 {
            for &i in &columns {
                bins.push(self.linear_index(BinCoordinate::new(i, j)));
            }
        }
        bins
    }

    /// Cell range `[first, last]` overlapped by `[lo, hi]` along one axis,
    /// clamped to `[0, n)`. `None` when the interval misses the axis.
    fn span(lo: f64, hi: f64, origin: f64, inv: f64, n: u32) -> Option<(u32, u32)> {
        let first = clamp_cells((lo - origin) * inv, n).floor() as i64;
        let last = last_cell(clamp_cells((hi - origin) * inv, n)).max(first);
        let n = i64::from(n);
        if last < 0 || first >= n {
            return None;
        }
        Some((first.max(0) as u32, last.min(n - 1) as u32))
    }
}

/// Keep a cell position within one cell of the axis so it casts exactly.
fn clamp_cells(cells: f64, n: u32) -> f64 {
    cells.clamp(-1.0, f64::from(n) + 1.0)
}

/// Last cell touched by an interval ending at cell position `cells`: an end
/// exactly on a cell boundary does not reach into the next cell.
fn last_cell(cells: f64) -> i64 {
    (cells.ceil() as i64) - 1
}
