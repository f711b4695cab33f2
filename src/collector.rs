//! Accumulates point records before they are indexed.

use crate::error::Result;
use crate::forest::{Forest, ForestConfig};
use crate::partition::dedup_and_partition;
use crate::point::{Location, PointRecord};

/// Collects point records in arrival order, without validating or deduplicating them.
///
/// Once everything has been added, [`pack`][PointCollector::pack] turns the buffer into a
/// [`Forest`] and releases it.
///
/// ```
/// use parallel_rtree::{Location, PointCollector};
/// use parallel_rtree::forest::ForestConfig;
///
/// let mut collector = PointCollector::new();
/// // A way whose second node could not be resolved, and which shares its first node with the
/// // next way
/// collector.add_way_nodes([(1, Some(Location::new(10, 10))), (2, None)]);
/// collector.add_way_nodes([(1, Some(Location::new(10, 10))), (3, Some(Location::new(20, 20)))]);
///
/// let forest = collector.pack(&ForestConfig::default()).unwrap();
/// assert_eq!(forest.size(), 2);
/// assert!(collector.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct PointCollector {
    points: Vec<PointRecord>,
}

impl PointCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a point to the buffer.
    #[inline]
    pub fn add(&mut self, point: PointRecord) {
        self.points.push(point);
    }

    /// Append the nodes of one way, skipping those whose location is unknown.
    ///
    /// Returns how many nodes were added.
    pub fn add_way_nodes<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = (u64, Option<Location>)>,
    {
        let before = self.points.len();
        self.points.extend(
            nodes
                .into_iter()
                .filter_map(|(id, location)| Some(PointRecord::from_location(id, location?))),
        );
        self.points.len() - before
    }

    /// The number of points collected so far, duplicates included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Hand over the collected points, leaving the collector empty.
    pub fn take(&mut self) -> Vec<PointRecord> {
        std::mem::take(&mut self.points)
    }

    /// Deduplicate and partition the collected points, then build a forest from them.
    ///
    /// The collector is empty afterwards, even if the build fails.
    pub fn pack(&mut self, config: &ForestConfig) -> Result<Forest<PointRecord>> {
        let points = dedup_and_partition(self.take());
        Forest::try_new_with_config(&points, config)
    }
}

impl Extend<PointRecord> for PointCollector {
    fn extend<I: IntoIterator<Item = PointRecord>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}
