//! Fixed-precision point records for OSM nodes.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ForestError, Result};
use crate::r#type::Indexable;
use crate::rtree::HaversineDistance;

/// Coordinate units per degree, matching the OSM fixed-precision encoding.
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// Digits after the decimal point needed to print a fixed-precision coordinate.
const PRECISION_DIGITS: usize = 7;

/// A resolved node location in fixed-precision degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub lon: i32,
    pub lat: i32,
}

impl Location {
    pub fn new(lon: i32, lat: i32) -> Self {
        Self { lon, lat }
    }

    /// Convert floating point degrees to a fixed-precision location.
    ///
    /// Fails for non-finite values and for coordinates outside ±180 longitude or ±90 latitude.
    pub fn from_degrees(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180. || lat.abs() > 90. {
            return Err(ForestError::InvalidCoordinate { lon, lat });
        }

        let precision = COORDINATE_PRECISION as f64;
        Ok(Self {
            lon: (lon * precision).round() as i32,
            lat: (lat * precision).round() as i32,
        })
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon as f64 / COORDINATE_PRECISION as f64
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat as f64 / COORDINATE_PRECISION as f64
    }
}

/// An OSM node id together with its fixed-precision location.
///
/// Records are compared and ordered by `id` only: two records with the same id are the same
/// node, whatever their coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointRecord {
    pub id: u64,
    pub lon: i32,
    pub lat: i32,
}

impl PointRecord {
    pub fn new(id: u64, lon: i32, lat: i32) -> Self {
        Self { id, lon, lat }
    }

    pub fn from_location(id: u64, location: Location) -> Self {
        Self::new(id, location.lon, location.lat)
    }

    /// Create a record from floating point degrees, see [`Location::from_degrees`].
    pub fn from_degrees(id: u64, lon: f64, lat: f64) -> Result<Self> {
        Ok(Self::from_location(id, Location::from_degrees(lon, lat)?))
    }

    pub fn location(&self) -> Location {
        Location::new(self.lon, self.lat)
    }
}

impl PartialEq for PointRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PointRecord {}

impl PartialOrd for PointRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PointRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for PointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location();
        write!(
            f,
            "{{id: {}, lon: {:.*}, lat: {:.*}}}",
            self.id,
            PRECISION_DIGITS,
            location.lon_degrees(),
            PRECISION_DIGITS,
            location.lat_degrees()
        )
    }
}

impl Indexable for PointRecord {
    type Coord = i32;
    type Metric = HaversineDistance;

    #[inline]
    fn x(&self) -> i32 {
        self.lon
    }

    #[inline]
    fn y(&self) -> i32 {
        self.lat
    }

    fn metric() -> HaversineDistance {
        HaversineDistance::fixed_precision(COORDINATE_PRECISION as f64)
    }
}
