use std::ops::Range;

use crate::error::{ForestError, Result};
use crate::forest::builder::{build_subtrees, ForestConfig};
use crate::forest::subtree::Subtree;
use crate::r#type::Indexable;

/// A spatial index made of independently built and independently queryable subtrees.
///
/// A forest is created empty or built once from a longitude-sorted slice of items (see
/// [`dedup_and_partition`][crate::partition::dedup_and_partition]). It is read-only afterwards,
/// except for [`clear`][Forest::clear] and [`rebuild`][Forest::rebuild]; there is no incremental
/// insertion.
///
/// ```
/// use parallel_rtree::forest::{Forest, ForestConfig};
/// use parallel_rtree::PointRecord;
///
/// let points = vec![
///     PointRecord::from_degrees(1, 13.0, 52.0).unwrap(),
///     PointRecord::from_degrees(2, 13.1, 52.1).unwrap(),
///     PointRecord::from_degrees(3, 13.5, 52.5).unwrap(),
/// ];
/// let config = ForestConfig::new().with_chunk_size(2);
/// let forest = Forest::try_new_with_config(&points, &config).unwrap();
/// assert_eq!(forest.size(), 3);
/// assert_eq!(forest.num_subtrees(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Forest<T: Indexable> {
    pub(crate) subtrees: Vec<Subtree<T>>,
}

impl<T: Indexable> Default for Forest<T> {
    fn default() -> Self {
        Self { subtrees: vec![] }
    }
}

impl<T: Indexable> Forest<T> {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest with the default [`ForestConfig`].
    pub fn try_new(items: &[T]) -> Result<Self> {
        Self::try_new_with_config(items, &ForestConfig::default())
    }

    /// Build a forest, one subtree per `config.chunk_size` consecutive items.
    ///
    /// `items` should be sorted by longitude. Results are correct in any order, but unsorted
    /// chunks overlap each other and make queries slower.
    pub fn try_new_with_config(items: &[T], config: &ForestConfig) -> Result<Self> {
        let subtrees = build_subtrees(items, config)?;
        Ok(Self { subtrees })
    }

    /// Build a forest from `items[range]`.
    ///
    /// Fails with [`ForestError::InvalidRange`] if the range runs backwards or past the end of
    /// `items`.
    pub fn try_from_range(items: &[T], range: Range<usize>, config: &ForestConfig) -> Result<Self> {
        if range.start > range.end || range.end > items.len() {
            return Err(ForestError::InvalidRange {
                start: range.start,
                end: range.end,
                len: items.len(),
            });
        }
        Self::try_new_with_config(&items[range], config)
    }

    /// Replace the contents of this forest with a fresh build.
    ///
    /// The forest is left untouched if the build fails.
    pub fn rebuild(&mut self, items: &[T], config: &ForestConfig) -> Result<()> {
        self.subtrees = build_subtrees(items, config)?;
        Ok(())
    }

    /// Total number of items over all subtrees.
    pub fn size(&self) -> usize {
        self.subtrees.iter().map(Subtree::len).sum()
    }

    /// `true` if no subtree holds any item.
    pub fn is_empty(&self) -> bool {
        !self.subtrees.iter().any(|subtree| !subtree.is_empty())
    }

    /// Empty every subtree in place.
    ///
    /// The subtrees themselves and their allocated storage are kept, so this is not the same as
    /// dropping the forest. Use [`rebuild`][Forest::rebuild] to fill it again.
    pub fn clear(&mut self) {
        self.subtrees.iter_mut().for_each(Subtree::clear);
    }

    /// The number of subtrees, including cleared ones.
    pub fn num_subtrees(&self) -> usize {
        self.subtrees.len()
    }

    /// The subtrees in no particular order.
    pub fn subtrees(&self) -> &[Subtree<T>] {
        &self.subtrees
    }
}
