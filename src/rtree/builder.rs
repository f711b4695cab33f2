use crate::error::{ForestError, Result};
use crate::r#type::IndexableNum;
use crate::rtree::index::{RTree, RTreeMetadata};
use crate::rtree::sort::{str_sort, SortParams};

/// The default node size used by [`RTreeBuilder::try_new`]
pub const DEFAULT_RTREE_NODE_SIZE: u16 = 16;

/// A builder to create an [`RTree`] over points.
///
/// ```
/// use parallel_rtree::rtree::{RTreeBuilder, RTreeIndex, EuclideanDistance};
///
/// let mut builder = RTreeBuilder::<i32>::try_new(3).unwrap();
/// builder.add(0, 0);
/// builder.add(1, 1);
/// builder.add(2, 2);
/// let tree = builder.finish();
///
/// let results = tree.neighbors(5, 5, Some(2), None, &EuclideanDistance);
/// let indices: Vec<u32> = results.iter().map(|(i, _)| *i).collect();
/// assert_eq!(indices, vec![2, 1]);
/// ```
pub struct RTreeBuilder<N: IndexableNum> {
    boxes: Vec<N>,
    indices: Vec<u32>,
    metadata: RTreeMetadata<N>,
    pos: usize,
    min_x: N,
    min_y: N,
    max_x: N,
    max_y: N,
}

impl<N: IndexableNum> RTreeBuilder<N> {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn try_new(num_items: u32) -> Result<Self> {
        Self::try_new_with_node_size(num_items, DEFAULT_RTREE_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// All storage the finished tree needs is reserved up front; a failed reservation is
    /// returned as [`ForestError::AllocationFailure`].
    pub fn try_new_with_node_size(num_items: u32, node_size: u16) -> Result<Self> {
        if node_size < 2 {
            return Err(ForestError::InvalidConfig(format!(
                "node size must be at least 2, got {}",
                node_size
            )));
        }

        let metadata = RTreeMetadata::<N>::new(num_items, node_size);

        let mut boxes = Vec::new();
        boxes
            .try_reserve_exact(metadata.boxes_len())
            .map_err(|err| allocation_failure(&metadata, err))?;
        boxes.resize(metadata.boxes_len(), N::zero());

        let mut indices = Vec::new();
        indices
            .try_reserve_exact(metadata.num_nodes())
            .map_err(|err| allocation_failure(&metadata, err))?;
        indices.resize(metadata.num_nodes(), 0);

        Ok(Self {
            boxes,
            indices,
            metadata,
            pos: 0,
            min_x: N::max_value(),
            min_y: N::max_value(),
            max_x: N::min_value(),
            max_y: N::min_value(),
        })
    }

    /// Access the underlying [RTreeMetadata] of this instance.
    pub fn metadata(&self) -> &RTreeMetadata<N> {
        &self.metadata
    }

    /// Add a point to the RTree.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    /// [`RTreeIndex::neighbors`][crate::rtree::RTreeIndex::neighbors] returns this same index.
    #[inline]
    pub fn add(&mut self, x: N, y: N) -> u32 {
        let index = self.pos >> 2;
        debug_assert!(index < self.metadata.num_items() as usize);

        self.indices[index] = index as u32;
        self.boxes[self.pos] = x;
        self.boxes[self.pos + 1] = y;
        self.boxes[self.pos + 2] = x;
        self.boxes[self.pos + 3] = y;
        self.pos += 4;

        if x < self.min_x {
            self.min_x = x
        };
        if y < self.min_y {
            self.min_y = y
        };
        if x > self.max_x {
            self.max_x = x
        };
        if y > self.max_y {
            self.max_y = y
        };

        index as u32
    }

    /// Consume this builder, performing the STR sort and generating an RTree ready for queries.
    pub fn finish(mut self) -> RTree<N> {
        let num_items = self.metadata.num_items() as usize;
        let node_size = self.metadata.node_size() as usize;
        assert_eq!(
            self.pos >> 2,
            num_items,
            "Added {} items when expected {}.",
            self.pos >> 2,
            num_items
        );

        // Zero items have no root, one item is its own root
        if num_items <= 1 {
            return RTree {
                boxes: self.boxes,
                indices: self.indices,
                metadata: self.metadata,
            };
        }

        if num_items <= node_size {
            // only one node, skip sorting and just fill the root box
            self.push_node(0, self.min_x, self.min_y, self.max_x, self.max_y);
            return RTree {
                boxes: self.boxes,
                indices: self.indices,
                metadata: self.metadata,
            };
        }

        let params = SortParams {
            num_items,
            node_size,
        };
        str_sort(&params, &mut self.boxes, &mut self.indices);

        // generate nodes at each tree level, bottom-up
        let level_bounds = self.metadata.level_bounds().to_vec();
        let mut pos = 0;
        for end in level_bounds[..level_bounds.len() - 1].iter().copied() {
            while pos < end {
                let node_index = pos;

                // calculate bbox for the new node
                let mut node_min_x = self.boxes[pos];
                let mut node_min_y = self.boxes[pos + 1];
                let mut node_max_x = self.boxes[pos + 2];
                let mut node_max_y = self.boxes[pos + 3];
                pos += 4;

                for _ in 1..node_size {
                    if pos >= end {
                        break;
                    }
                    if self.boxes[pos] < node_min_x {
                        node_min_x = self.boxes[pos];
                    }
                    if self.boxes[pos + 1] < node_min_y {
                        node_min_y = self.boxes[pos + 1];
                    }
                    if self.boxes[pos + 2] > node_max_x {
                        node_max_x = self.boxes[pos + 2];
                    }
                    if self.boxes[pos + 3] > node_max_y {
                        node_max_y = self.boxes[pos + 3];
                    }
                    pos += 4;
                }

                self.push_node(node_index, node_min_x, node_min_y, node_max_x, node_max_y);
            }
        }

        RTree {
            boxes: self.boxes,
            indices: self.indices,
            metadata: self.metadata,
        }
    }

    /// Append an internal node whose children start at `child_pos` in the boxes buffer.
    #[inline]
    fn push_node(&mut self, child_pos: usize, min_x: N, min_y: N, max_x: N, max_y: N) {
        self.indices[self.pos >> 2] = child_pos as u32;
        self.boxes[self.pos] = min_x;
        self.boxes[self.pos + 1] = min_y;
        self.boxes[self.pos + 2] = max_x;
        self.boxes[self.pos + 3] = max_y;
        self.pos += 4;
    }
}

fn allocation_failure<N: IndexableNum>(
    metadata: &RTreeMetadata<N>,
    err: std::collections::TryReserveError,
) -> ForestError {
    ForestError::AllocationFailure(format!(
        "could not reserve {} bytes for {} items: {}",
        metadata.data_buffer_length(),
        metadata.num_items(),
        err
    ))
}
