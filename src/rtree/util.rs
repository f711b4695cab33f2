//! Utilities for generating RTrees.

/// Calculate the total number of nodes in the R-tree to allocate space for
/// and the index of each tree level (used in search later)
///
/// An empty tree has no nodes and no levels.
pub(crate) fn compute_num_nodes(num_items: u32, node_size: u16) -> (usize, Vec<usize>) {
    // The public API uses u32 and u16 types but internally we use usize
    let num_items = num_items as usize;
    let node_size = node_size as usize;

    if num_items == 0 {
        return (0, vec![]);
    }

    let mut n = num_items;
    let mut num_nodes = n;
    let mut level_bounds = vec![n * 4];
    while n != 1 {
        n = n.div_ceil(node_size);
        num_nodes += n;
        level_bounds.push(num_nodes * 4);
    }
    (num_nodes, level_bounds)
}

/// Binary search for the first value in `arr` strictly greater than `value`.
///
/// `arr` holds the level bounds, so the result is the end offset of the level containing
/// `value`.
#[inline]
pub(crate) fn upper_bound(value: usize, arr: &[usize]) -> usize {
    let mut i = 0;
    let mut j = arr.len() - 1;

    while i < j {
        let m = (i + j) >> 1;
        if arr[m] > value {
            j = m;
        } else {
            i = m + 1;
        }
    }

    arr[i]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_nodes_per_level() {
        let (num_nodes, level_bounds) = compute_num_nodes(100, 16);
        // 100 leaves, 7 nodes, 1 root
        assert_eq!(num_nodes, 108);
        assert_eq!(level_bounds, vec![400, 428, 432]);
    }

    #[test]
    fn single_item_has_one_level() {
        let (num_nodes, level_bounds) = compute_num_nodes(1, 16);
        assert_eq!(num_nodes, 1);
        assert_eq!(level_bounds, vec![4]);
    }

    #[test]
    fn empty_tree_has_no_levels() {
        let (num_nodes, level_bounds) = compute_num_nodes(0, 16);
        assert_eq!(num_nodes, 0);
        assert!(level_bounds.is_empty());
    }

    #[test]
    fn upper_bound_finds_level_end() {
        let bounds = [400, 428, 432];
        assert_eq!(upper_bound(0, &bounds), 400);
        assert_eq!(upper_bound(396, &bounds), 400);
        assert_eq!(upper_bound(400, &bounds), 428);
        assert_eq!(upper_bound(428, &bounds), 432);
    }
}
