//! Queries answered by merging the results of every subtree.

use std::cmp::Ordering;

use crate::error::{ForestError, Result};
use crate::forest::index::Forest;
use crate::r#type::{Indexable, IndexableNum};
use crate::rtree::DistanceMetric;

/// A spatial query against a [`Forest`].
///
/// Only [`Query::Nearest`] can be merged across subtrees: the true top `k` always lies within
/// the union of each subtree's own top `k`. Box queries would need a different merge (a union
/// deduplicated by identity) and are rejected with [`ForestError::UnsupportedQuery`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Query<N: IndexableNum> {
    /// The `k` items nearest to `(x, y)`.
    Nearest { x: N, y: N, k: usize },
    /// Every item inside a bounding box.
    Intersects {
        min_x: N,
        min_y: N,
        max_x: N,
        max_y: N,
    },
}

impl<N: IndexableNum> Query<N> {
    pub fn nearest(x: N, y: N, k: usize) -> Self {
        Self::Nearest { x, y, k }
    }
}

impl<T: Indexable> Forest<T> {
    /// Run a query against the whole forest.
    pub fn query(&self, query: &Query<T::Coord>) -> Result<Vec<T>> {
        match *query {
            Query::Nearest { x, y, k } => Ok(self.nearest(x, y, k)),
            Query::Intersects { .. } => Err(ForestError::UnsupportedQuery(
                "only nearest neighbor queries can be merged across subtrees",
            )),
        }
    }

    /// The `k` items nearest to `(x, y)` under the items' own metric, nearest first.
    ///
    /// Fewer than `k` items are returned if the forest holds fewer. The items are copies, so
    /// they stay valid after the forest changes.
    pub fn nearest(&self, x: T::Coord, y: T::Coord, k: usize) -> Vec<T> {
        self.nearest_with_metric(x, y, k, &T::metric())
    }

    /// The `k` items nearest to `(x, y)` under `metric`, nearest first.
    pub fn nearest_with_metric<M: DistanceMetric<T::Coord> + ?Sized>(
        &self,
        x: T::Coord,
        y: T::Coord,
        k: usize,
        metric: &M,
    ) -> Vec<T> {
        self.merge_nearest(x, y, k, metric)
            .into_iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Like [`nearest_with_metric`][Forest::nearest_with_metric], paired with each item's
    /// distance.
    pub fn nearest_with_distance<M: DistanceMetric<T::Coord> + ?Sized>(
        &self,
        x: T::Coord,
        y: T::Coord,
        k: usize,
        metric: &M,
    ) -> Vec<(T, f64)> {
        self.merge_nearest(x, y, k, metric)
            .into_iter()
            .map(|(dist, item)| (item.clone(), dist))
            .collect()
    }

    /// Gather each subtree's top `k`, then select and order the global top `k`.
    ///
    /// Subtrees are searched one after the other; a single tree search is already fast enough
    /// that fanning out would mostly add overhead.
    fn merge_nearest<M: DistanceMetric<T::Coord> + ?Sized>(
        &self,
        x: T::Coord,
        y: T::Coord,
        k: usize,
        metric: &M,
    ) -> Vec<(f64, &T)> {
        if k == 0 {
            return vec![];
        }

        let capacity = self.subtrees.iter().map(|s| s.len().min(k)).sum();
        let mut all: Vec<(f64, &T)> = Vec::with_capacity(capacity);
        for subtree in &self.subtrees {
            all.extend(subtree.nearest(x, y, k, metric));
        }

        let num_candidates = all.len();
        let n = k.min(num_candidates);
        if n < num_candidates {
            all.select_nth_unstable_by(n, by_distance);
            all.truncate(n);
        }
        all.sort_unstable_by(by_distance);

        log::trace!(
            "merged {} candidates from {} subtrees into {}",
            num_candidates,
            self.subtrees.len(),
            all.len()
        );
        all
    }
}

#[inline]
fn by_distance<T>(a: &(f64, T), b: &(f64, T)) -> Ordering {
    a.0.total_cmp(&b.0)
}
