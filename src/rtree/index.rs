use std::marker::PhantomData;

use crate::r#type::IndexableNum;
use crate::rtree::util::compute_num_nodes;

/// Common metadata to describe a tree
#[derive(Debug, Clone, PartialEq)]
pub struct RTreeMetadata<N: IndexableNum> {
    node_size: u16,
    num_items: u32,
    num_nodes: usize,
    level_bounds: Vec<usize>,
    phantom: PhantomData<N>,
}

impl<N: IndexableNum> RTreeMetadata<N> {
    /// Compute the layout of a tree holding `num_items` items with the given node size.
    pub fn new(num_items: u32, node_size: u16) -> Self {
        let (num_nodes, level_bounds) = compute_num_nodes(num_items, node_size);
        Self {
            node_size,
            num_items,
            num_nodes,
            level_bounds,
            phantom: PhantomData,
        }
    }

    /// The number of coordinates in the boxes buffer, four per node.
    pub fn boxes_len(&self) -> usize {
        self.num_nodes * 4
    }

    /// The number of bytes the tree storage takes up.
    pub fn data_buffer_length(&self) -> usize {
        self.boxes_len() * N::BYTES_PER_ELEMENT + self.num_nodes * std::mem::size_of::<u32>()
    }

    /// The maximum number of children per node.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// The number of leaf items.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    /// The number of leaf and intermediate nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The offsets into the boxes buffer where each level ends, bottom-up.
    pub fn level_bounds(&self) -> &[usize] {
        &self.level_bounds
    }
}

/// A packed, immutable RTree over points.
///
/// Usually this will be created from scratch via [`RTreeBuilder`][crate::rtree::RTreeBuilder].
/// The only mutation allowed after building is [`clear`][RTree::clear].
#[derive(Debug, Clone, PartialEq)]
pub struct RTree<N: IndexableNum> {
    pub(crate) boxes: Vec<N>,
    pub(crate) indices: Vec<u32>,
    pub(crate) metadata: RTreeMetadata<N>,
}

impl<N: IndexableNum> RTree<N> {
    /// Remove every item while keeping the allocated storage for reuse.
    pub fn clear(&mut self) {
        self.boxes.clear();
        self.indices.clear();
        self.metadata = RTreeMetadata::new(0, self.metadata.node_size);
    }

    /// The number of coordinates this tree can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.boxes.capacity()
    }
}
