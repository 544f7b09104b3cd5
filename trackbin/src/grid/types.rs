//! Grid type definitions

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Full longitude cycle in degrees.
pub const FULL_CYCLE: f64 = 360.0;

/// Tolerance used when deciding whether a domain spans a full cycle.
const CYCLE_TOLERANCE: f64 = 1e-9;

/// Column/row position of a bin within a [`BinGrid`](super::BinGrid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinCoordinate {
    /// Column (x direction), 0 at the west edge
    pub i: u32,
    /// Row (y direction), 0 at the south edge
    pub j: u32,
}

impl BinCoordinate {
    pub fn new(i: u32, j: u32) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for BinCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// A rectangular west/east/south/north area.
///
/// Used both as the domain of a grid and as a query region. Parses from
/// and formats as `west/east/south/north`.
///
/// # Examples
///
/// ```
/// use trackbin::grid::Region;
///
/// let region: Region = "0/360/-90/90".parse().unwrap();
/// assert_eq!(region.width(), 360.0);
/// assert_eq!(region.to_string(), "0/360/-90/90");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    /// Create a region, rejecting empty or non-finite rectangles.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self, GridError> {
        let region = Self {
            west,
            east,
            south,
            north,
        };
        region.validate()?;
        Ok(region)
    }

    /// The whole globe with 0-360 longitudes.
    pub fn global() -> Self {
        Self {
            west: 0.0,
            east: FULL_CYCLE,
            south: -90.0,
            north: 90.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// True when the east-west extent is one full longitude cycle.
    pub fn spans_full_cycle(&self) -> bool {
        (self.width() - FULL_CYCLE).abs() < CYCLE_TOLERANCE
    }

    fn validate(&self) -> Result<(), GridError> {
        let finite = [self.west, self.east, self.south, self.north]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.west >= self.east || self.south >= self.north {
            return Err(GridError::InvalidDomain(*self));
        }
        Ok(())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.west, self.east, self.south, self.north)
    }
}

impl FromStr for Region {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 4 {
            return Err(GridError::InvalidRegionSyntax(s.to_string()));
        }
        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| GridError::InvalidRegionSyntax(s.to_string()))?;
        }
        Region::new(values[0], values[1], values[2], values[3])
    }
}

/// Errors raised by grid construction and binning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Point falls outside the grid even after periodic adjustment
    #[error("Coordinate ({x}, {y}) is outside the grid domain")]
    CoordinateOutOfRange { x: f64, y: f64 },

    /// Domain rectangle is empty or not finite
    #[error("Invalid domain {0}: west must be < east and south < north")]
    InvalidDomain(Region),

    /// Increment is not positive or yields no bins
    #[error("Invalid bin increment {dx}/{dy}: {reason}")]
    InvalidIncrement { dx: f64, dy: f64, reason: String },

    /// Linear bin index beyond the grid
    #[error("Bin index {index} is outside the grid ({n_bins} bins)")]
    BinOutOfRange { index: u32, n_bins: u32 },

    /// Region string is not `west/east/south/north`
    #[error("Invalid region '{0}': expected west/east/south/north")]
    InvalidRegionSyntax(String),
}
