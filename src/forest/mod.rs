//! A forest of packed RTrees built in parallel from consecutive chunks of sorted items.

mod builder;
mod index;
mod query;
mod subtree;

pub use builder::{ForestConfig, DEFAULT_CHUNK_SIZE};
pub use index::Forest;
pub use query::Query;
pub use subtree::Subtree;
