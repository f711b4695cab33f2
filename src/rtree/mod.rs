//! An implementation of an immutable, packed RTree over points.
//!
//! Each tree is built in one pass from a known number of points and is never modified
//! afterwards, apart from being cleared. A [`Forest`][crate::forest::Forest] holds many of them.

pub mod builder;
pub mod distance;
pub mod index;
mod sort;
pub mod r#trait;
pub(crate) mod util;

pub use builder::{RTreeBuilder, DEFAULT_RTREE_NODE_SIZE};
pub use distance::{DistanceMetric, EuclideanDistance, HaversineDistance};
pub use index::{RTree, RTreeMetadata};
pub use r#trait::RTreeIndex;
