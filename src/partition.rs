//! Deduplication and spatial partitioning of collected points.
//!
//! Two sorts are needed: deduplication works on the identity order of the items, while chunking
//! needs a spatial order. A single comparator over both would no longer tell duplicates apart
//! from distinct items sharing a longitude.

use std::cmp::Ordering;

#[cfg(feature = "rayon")]
use rayon::slice::ParallelSliceMut;

use crate::r#type::Indexable;

/// Remove duplicate items and sort the rest by longitude (x).
///
/// Items with equal `Ord` are duplicates; which of them is kept is unspecified. Items sharing a
/// longitude are ordered by `Ord`, so the output only depends on the set of items given and
/// running this again on its own output changes nothing.
///
/// Both sorts run on the rayon pool when the `rayon` feature is enabled.
pub fn dedup_and_partition<T: Indexable + Ord>(mut items: Vec<T>) -> Vec<T> {
    let len = items.len();

    sort_unstable_by(&mut items, Ord::cmp);
    items.dedup();
    log::debug!(
        "deduplicated {} items down to {} distinct",
        len,
        items.len()
    );

    sort_unstable_by(&mut items, partition_order::<T>);
    items
}

/// Whether `items` are ordered by longitude, the precondition of building a forest.
pub fn is_partitioned<T: Indexable>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|pair| pair[0].x().partial_cmp(&pair[1].x()) != Some(Ordering::Greater))
}

/// Longitude first, identity for ties.
fn partition_order<T: Indexable + Ord>(a: &T, b: &T) -> Ordering {
    a.x()
        .partial_cmp(&b.x())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.cmp(b))
}

#[cfg(feature = "rayon")]
#[inline]
fn sort_unstable_by<T, F>(items: &mut [T], compare: F)
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    items.par_sort_unstable_by(compare);
}

#[cfg(not(feature = "rayon"))]
#[inline]
fn sort_unstable_by<T, F>(items: &mut [T], compare: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    items.sort_unstable_by(compare);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::point::PointRecord;

    #[test]
    fn removes_duplicate_ids() {
        let points = vec![
            PointRecord::new(3, 30, 0),
            PointRecord::new(1, 10, 0),
            PointRecord::new(3, 30, 0),
            PointRecord::new(2, 20, 0),
            PointRecord::new(1, 10, 0),
        ];
        let out = dedup_and_partition(points);
        let ids: Vec<u64> = out.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn orders_by_longitude_then_id() {
        let points = vec![
            PointRecord::new(1, 50, 0),
            PointRecord::new(5, -20, 0),
            PointRecord::new(4, 50, 9),
            PointRecord::new(2, 50, -9),
            PointRecord::new(3, 0, 0),
        ];
        let out = dedup_and_partition(points);
        let ids: Vec<u64> = out.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 3, 1, 2, 4]);
        assert!(is_partitioned(&out));
    }

    #[test]
    fn keeps_one_of_conflicting_duplicates() {
        let points = vec![PointRecord::new(9, 100, 0), PointRecord::new(9, -100, 0)];
        let out = dedup_and_partition(points);
        assert_eq!(out.len(), 1);
        assert!(out[0].lon == 100 || out[0].lon == -100);
    }

    #[test]
    fn empty_input() {
        let out = dedup_and_partition(Vec::<PointRecord>::new());
        assert!(out.is_empty());
        assert!(is_partitioned(&out));
    }

    #[test]
    fn detects_unsorted_input() {
        let points = [PointRecord::new(1, 5, 0), PointRecord::new(2, 4, 0)];
        assert!(!is_partitioned(&points));
    }
}
