//! Fixtures shared by the crate's tests.

mod properties;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::point::{PointRecord, COORDINATE_PRECISION};
use crate::r#type::Indexable;
use crate::rtree::DistanceMetric;

/// Points spread over a box around Berlin, with ids drawn from `0..max_id` so that some repeat.
pub(crate) fn random_points(seed: u64, n: usize, max_id: u64) -> Vec<PointRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let lon = 12 * COORDINATE_PRECISION..15 * COORDINATE_PRECISION;
    let lat = 51 * COORDINATE_PRECISION..54 * COORDINATE_PRECISION;
    (0..n)
        .map(|_| {
            PointRecord::new(
                rng.gen_range(0..max_id),
                rng.gen_range(lon.clone()),
                rng.gen_range(lat.clone()),
            )
        })
        .collect()
}

/// Distances of the `k` items nearest to `(x, y)`, found by scanning every item.
pub(crate) fn brute_force_distances<T: Indexable, M: DistanceMetric<T::Coord>>(
    items: &[T],
    x: T::Coord,
    y: T::Coord,
    k: usize,
    metric: &M,
) -> Vec<f64> {
    let mut dists: Vec<f64> = items
        .iter()
        .map(|item| metric.distance(x, y, item.x(), item.y()))
        .collect();
    dists.sort_by(f64::total_cmp);
    dists.truncate(k);
    dists
}
