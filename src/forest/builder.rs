use parking_lot::Mutex;
#[cfg(feature = "rayon")]
use rayon::iter::ParallelIterator;
#[cfg(feature = "rayon")]
use rayon::slice::ParallelSlice;

use crate::error::{ForestError, Result};
use crate::forest::subtree::Subtree;
use crate::r#type::Indexable;
use crate::rtree::DEFAULT_RTREE_NODE_SIZE;

/// The default number of items per subtree.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Tunables for building a [`Forest`][crate::forest::Forest].
///
/// ```
/// use parallel_rtree::forest::ForestConfig;
///
/// let config = ForestConfig::new().with_chunk_size(50_000).with_node_size(32);
/// assert_eq!(config.chunk_size, 50_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestConfig {
    /// Maximum number of items per subtree. Only construction parallelism depends on it; query
    /// results are the same for every chunk size.
    pub chunk_size: usize,
    /// Maximum number of children per RTree node.
    pub node_size: u16,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            node_size: DEFAULT_RTREE_NODE_SIZE,
        }
    }
}

impl ForestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        Self { chunk_size, ..self }
    }

    pub fn with_node_size(self, node_size: u16) -> Self {
        Self { node_size, ..self }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > u32::MAX as usize {
            return Err(ForestError::InvalidConfig(format!(
                "chunk size must be between 1 and {}, got {}",
                u32::MAX,
                self.chunk_size
            )));
        }
        if self.node_size < 2 {
            return Err(ForestError::InvalidConfig(format!(
                "node size must be at least 2, got {}",
                self.node_size
            )));
        }
        Ok(())
    }
}

/// Build one subtree per chunk of `items`, in parallel when the `rayon` feature is enabled.
///
/// `items` should already be sorted by longitude so each chunk covers a narrow band; nothing
/// here re-sorts them. Either every chunk ends up in the returned subtrees or an error is
/// returned and all finished subtrees are dropped.
pub(crate) fn build_subtrees<T: Indexable>(
    items: &[T],
    config: &ForestConfig,
) -> Result<Vec<Subtree<T>>> {
    config.validate()?;

    let num_chunks = items.len().div_ceil(config.chunk_size);
    log::debug!(
        "building {} subtrees from {} items (chunk size {})",
        num_chunks,
        items.len(),
        config.chunk_size
    );

    // Subtrees are built without holding the lock, which only guards the push.
    let pre_forest = Mutex::new(Vec::with_capacity(num_chunks));

    let build_chunk = |chunk: &[T]| -> Result<()> {
        let subtree = Subtree::try_new(chunk, config.node_size)?;
        log::trace!("built subtree of {} items", subtree.len());

        pre_forest.lock().push(subtree);
        Ok(())
    };

    #[cfg(feature = "rayon")]
    let result = items.par_chunks(config.chunk_size).try_for_each(build_chunk);

    #[cfg(not(feature = "rayon"))]
    let result = items.chunks(config.chunk_size).try_for_each(build_chunk);

    if let Err(err) = result {
        log::warn!("abandoning forest build: {}", err);
        return Err(err);
    }

    let subtrees = pre_forest.into_inner();
    debug_assert_eq!(subtrees.len(), num_chunks);
    log::debug!("built {} subtrees", subtrees.len());
    Ok(subtrees)
}
