//! Distance metrics for nearest-neighbor queries.
//!
//! Metrics only need to rank items consistently: a query merges candidates from many trees by
//! comparing their distances, so every tree in a forest must be searched with the same metric.

use geo::algorithm::{Distance, Haversine};
use geo::Point;

use crate::r#type::IndexableNum;

/// A trait for calculating distances between points and from a point to a bounding box.
///
/// `distance_to_bbox` must never exceed `distance` to any point inside the box, otherwise
/// best-first traversal may skip a closer item.
pub trait DistanceMetric<N: IndexableNum> {
    /// Distance between two points.
    fn distance(&self, x1: N, y1: N, x2: N, y2: N) -> f64;

    /// Distance from a point to the closest point of a bounding box.
    fn distance_to_bbox(&self, x: N, y: N, min_x: N, min_y: N, max_x: N, max_y: N) -> f64;
}

/// Squared Euclidean distance.
///
/// This is planar and comparable rather than exact: it preserves the order of true Euclidean
/// distances without taking a square root. Any `max_distance` passed alongside it is squared
/// too.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl<N: IndexableNum> DistanceMetric<N> for EuclideanDistance {
    #[inline]
    fn distance(&self, x1: N, y1: N, x2: N, y2: N) -> f64 {
        let dx = x1.as_f64() - x2.as_f64();
        let dy = y1.as_f64() - y2.as_f64();
        dx * dx + dy * dy
    }

    #[inline]
    fn distance_to_bbox(&self, x: N, y: N, min_x: N, min_y: N, max_x: N, max_y: N) -> f64 {
        let dx = axis_dist(x.as_f64(), min_x.as_f64(), max_x.as_f64());
        let dy = axis_dist(y.as_f64(), min_y.as_f64(), max_y.as_f64());
        dx * dx + dy * dy
    }
}

/// Haversine distance metric.
///
/// This calculates the great-circle distance in meters between two points on a sphere, using
/// `geo`'s haversine. Input coordinates are longitude/latitude in degrees multiplied by `scale`,
/// so fixed-precision integer coordinates can be ranked without converting them first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaversineDistance {
    /// Coordinate units per degree
    pub scale: f64,
}

impl Default for HaversineDistance {
    fn default() -> Self {
        Self::fixed_precision(1.0)
    }
}

impl HaversineDistance {
    /// Create a metric over coordinates stored as `degrees * scale`.
    pub const fn fixed_precision(scale: f64) -> Self {
        Self { scale }
    }

    #[inline]
    fn degrees<N: IndexableNum>(&self, value: N) -> f64 {
        value.as_f64() / self.scale
    }

    #[inline]
    fn between(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
        Haversine.distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
    }
}

impl<N: IndexableNum> DistanceMetric<N> for HaversineDistance {
    fn distance(&self, lon1: N, lat1: N, lon2: N, lat2: N) -> f64 {
        self.between(
            self.degrees(lon1),
            self.degrees(lat1),
            self.degrees(lon2),
            self.degrees(lat2),
        )
    }

    fn distance_to_bbox(
        &self,
        lon: N,
        lat: N,
        min_lon: N,
        min_lat: N,
        max_lon: N,
        max_lat: N,
    ) -> f64 {
        let lon = self.degrees(lon);
        let lat = self.degrees(lat);
        let min_lon = self.degrees(min_lon);
        let min_lat = self.degrees(min_lat);
        let max_lon = self.degrees(max_lon);
        let max_lat = self.degrees(max_lat);

        if (min_lon..=max_lon).contains(&lon) {
            // Straight along the meridian
            return self.between(lon, lat, lon, lat.clamp(min_lat, max_lat));
        }

        // Closest point lies on the nearer of the two meridian edges
        let west = lon_delta(lon, min_lon);
        let east = lon_delta(lon, max_lon);
        let (edge_lon, delta) = if west <= east {
            (min_lon, west)
        } else {
            (max_lon, east)
        };

        // Latitude of the great-circle foot point on the edge meridian, clamped into the box
        let (lat_r, delta_r) = (lat.to_radians(), delta.to_radians());
        let foot = f64::atan2(lat_r.sin(), lat_r.cos() * delta_r.cos()).to_degrees();
        self.between(lon, lat, edge_lon, foot.clamp(min_lat, max_lat))
    }
}

/// 1D distance from a value to a range.
#[inline]
pub(crate) fn axis_dist(k: f64, min: f64, max: f64) -> f64 {
    if k < min {
        min - k
    } else if k <= max {
        0.
    } else {
        k - max
    }
}

/// Absolute longitude difference in degrees, wrapped into `0..=180`.
#[inline]
fn lon_delta(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs() % 360.;
    if delta > 180. {
        360. - delta
    } else {
        delta
    }
}
