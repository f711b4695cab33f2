use crate::error::{ForestError, Result};
use crate::r#type::Indexable;
use crate::rtree::{DistanceMetric, RTree, RTreeBuilder, RTreeIndex};

/// One partition of a [`Forest`][crate::forest::Forest]: a packed RTree together with the items
/// it indexes.
///
/// A subtree is self-contained and can be queried on its own. Items are kept in insertion order,
/// so the indices the tree returns look them up directly.
#[derive(Debug, Clone)]
pub struct Subtree<T: Indexable> {
    tree: RTree<T::Coord>,
    items: Vec<T>,
}

impl<T: Indexable> Subtree<T> {
    /// Bulk-load a subtree from a chunk of items.
    pub fn try_new(items: &[T], node_size: u16) -> Result<Self> {
        let num_items = u32::try_from(items.len()).map_err(|_| {
            ForestError::InvalidConfig(format!(
                "a subtree holds at most {} items, got {}",
                u32::MAX,
                items.len()
            ))
        })?;

        let mut builder = RTreeBuilder::try_new_with_node_size(num_items, node_size)?;
        for item in items {
            builder.add(item.x(), item.y());
        }

        let mut owned = Vec::new();
        owned.try_reserve_exact(items.len()).map_err(|err| {
            ForestError::AllocationFailure(format!(
                "could not copy {} items into a subtree: {}",
                items.len(),
                err
            ))
        })?;
        owned.extend_from_slice(items);

        Ok(Self {
            tree: builder.finish(),
            items: owned,
        })
    }

    /// The number of items in this subtree.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every item, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.items.clear();
    }

    pub fn tree(&self) -> &RTree<T::Coord> {
        &self.tree
    }

    /// The items of this subtree in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The `k` items closest to `(x, y)` with their distances, nearest first.
    pub fn nearest<M: DistanceMetric<T::Coord> + ?Sized>(
        &self,
        x: T::Coord,
        y: T::Coord,
        k: usize,
        metric: &M,
    ) -> Vec<(f64, &T)> {
        self.tree
            .neighbors(x, y, Some(k), None, metric)
            .into_iter()
            .map(|(index, dist)| (dist, &self.items[index as usize]))
            .collect()
    }

    /// The items inside a bounding box, in no particular order.
    pub fn search(
        &self,
        min_x: T::Coord,
        min_y: T::Coord,
        max_x: T::Coord,
        max_y: T::Coord,
    ) -> Vec<&T> {
        self.tree
            .search(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|index| &self.items[index as usize])
            .collect()
    }
}
