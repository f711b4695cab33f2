use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::r#type::IndexableNum;
use crate::rtree::distance::DistanceMetric;
use crate::rtree::index::{RTree, RTreeMetadata};
use crate::rtree::util::upper_bound;

/// A trait for searching and accessing data out of an RTree.
pub trait RTreeIndex<N: IndexableNum>: Sized {
    /// A slice representing all the bounding boxes of all elements contained within this tree,
    /// including the bounding boxes of each internal node.
    fn boxes(&self) -> &[N];

    /// A slice representing the indices within the `boxes` slice, including internal nodes.
    fn indices(&self) -> &[u32];

    /// Access the metadata describing this RTree
    fn metadata(&self) -> &RTreeMetadata<N>;

    /// The total number of items contained in this RTree.
    fn num_items(&self) -> u32 {
        self.metadata().num_items()
    }

    /// The total number of nodes in this RTree, including both leaf and intermediate nodes.
    fn num_nodes(&self) -> usize {
        self.metadata().num_nodes()
    }

    /// The maximum number of elements in each node.
    fn node_size(&self) -> u16 {
        self.metadata().node_size()
    }

    /// The offsets into [RTreeIndex::boxes] where each level's boxes starts and ends. The tree is
    /// laid out bottom-up, and there's an implicit initial 0. So the boxes of the lowest level of
    /// the tree are located from `boxes[0..self.level_bounds()[0]]`.
    fn level_bounds<'a>(&'a self) -> &'a [usize]
    where
        N: 'a,
    {
        self.metadata().level_bounds()
    }

    /// Search an RTree given the provided bounding box.
    ///
    /// Results are the indexes of the inserted points, in no particular order.
    fn search(&self, min_x: N, min_y: N, max_x: N, max_y: N) -> Vec<u32> {
        let boxes = self.boxes();
        let indices = self.indices();
        let num_items = self.num_items() as usize;
        let node_size = self.node_size() as usize;

        let mut outer_node_index = boxes.len().checked_sub(4);
        let mut queue = vec![];
        let mut results = vec![];

        while let Some(node_index) = outer_node_index {
            // find the end index of the node
            let end = (node_index + node_size * 4).min(upper_bound(node_index, self.level_bounds()));

            // search through child nodes
            for pos in (node_index..end).step_by(4) {
                // check if node bbox intersects with query bbox
                if max_x < boxes[pos] {
                    continue; // maxX < nodeMinX
                }
                if max_y < boxes[pos + 1] {
                    continue; // maxY < nodeMinY
                }
                if min_x > boxes[pos + 2] {
                    continue; // minX > nodeMaxX
                }
                if min_y > boxes[pos + 3] {
                    continue; // minY > nodeMaxY
                }

                let index = indices[pos >> 2];
                if node_index >= num_items * 4 {
                    queue.push(index as usize); // node; add it to the search queue
                } else {
                    results.push(index); // leaf item
                }
            }

            outer_node_index = queue.pop();
        }

        results
    }

    /// Search items in order of distance from the given point.
    ///
    /// Returns `(insertion index, distance)` pairs, nearest first. At most `max_results` items
    /// are returned, and none further away than `max_distance` under `metric`.
    fn neighbors<M: DistanceMetric<N> + ?Sized>(
        &self,
        x: N,
        y: N,
        max_results: Option<usize>,
        max_distance: Option<f64>,
        metric: &M,
    ) -> Vec<(u32, f64)> {
        let boxes = self.boxes();
        let indices = self.indices();
        let num_items = self.num_items() as usize;
        let node_size = self.node_size() as usize;
        let max_distance = max_distance.unwrap_or(f64::INFINITY);

        let mut results: Vec<(u32, f64)> = vec![];
        if max_results == Some(0) {
            return results;
        }

        let mut outer_node_index = boxes.len().checked_sub(4);
        let mut queue = BinaryHeap::new();

        'outer: while let Some(node_index) = outer_node_index {
            // find the end index of the node
            let end = (node_index + node_size * 4).min(upper_bound(node_index, self.level_bounds()));
            let is_leaf_level = node_index < num_items * 4;

            // add child nodes to the queue
            for pos in (node_index..end).step_by(4) {
                let index = indices[pos >> 2] as usize;

                let dist = if is_leaf_level {
                    metric.distance(x, y, boxes[pos], boxes[pos + 1])
                } else {
                    metric.distance_to_bbox(
                        x,
                        y,
                        boxes[pos],
                        boxes[pos + 1],
                        boxes[pos + 2],
                        boxes[pos + 3],
                    )
                };
                if dist > max_distance {
                    continue;
                }

                // leaf items use odd ids, nodes even ones
                let id = if is_leaf_level {
                    (index << 1) + 1
                } else {
                    index << 1
                };
                queue.push(Reverse(NeighborNode { id, dist }));
            }

            // pop items from the queue
            while queue.peek().is_some_and(|Reverse(node)| node.is_leaf()) {
                let Some(Reverse(item)) = queue.pop() else {
                    break;
                };
                results.push(((item.id >> 1) as u32, item.dist));
                if max_results.is_some_and(|max_results| results.len() == max_results) {
                    break 'outer;
                }
            }

            outer_node_index = queue.pop().map(|Reverse(item)| item.id >> 1);
        }

        results
    }
}

/// A wrapper around a node and its distance for use in the priority queue.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NeighborNode {
    id: usize,
    dist: f64,
}

impl NeighborNode {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.id & 1 != 0
    }
}

impl Eq for NeighborNode {}

impl Ord for NeighborNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

impl PartialOrd for NeighborNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: IndexableNum> RTreeIndex<N> for RTree<N> {
    fn boxes(&self) -> &[N] {
        &self.boxes
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn metadata(&self) -> &RTreeMetadata<N> {
        &self.metadata
    }
}
