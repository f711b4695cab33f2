//! Sort-tile-recursive (STR) packing for point trees.
//!
//! The implementation is derived from [this
//! paper](https://ia600900.us.archive.org/27/items/nasa_techdoc_19970016975/19970016975.pdf).
//! Items are points stored as degenerate boxes, so the sort key of an item is read straight out
//! of its box instead of from a separate buffer of centers.

#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::r#type::IndexableNum;

const X_AXIS: usize = 0;
const Y_AXIS: usize = 1;

/// Parameters of the leaf level being sorted.
pub(crate) struct SortParams {
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
}

/// Order the leaf boxes and their indices so that every run of `node_size` items is spatially
/// compact: vertical slices by x, then runs by y within each slice.
pub(crate) fn str_sort<N: IndexableNum>(
    params: &SortParams,
    boxes: &mut [N],
    indices: &mut [u32],
) {
    let boxes = &mut boxes[..params.num_items * 4];
    let indices = &mut indices[..params.num_items];

    sort(
        boxes,
        indices,
        0,
        params.num_items - 1,
        params.node_size,
        X_AXIS,
    );

    let num_leaf_nodes = params.num_items.div_ceil(params.node_size);
    let num_vertical_slices = (num_leaf_nodes as f64).sqrt().ceil() as usize;
    let num_items_per_slice = num_vertical_slices * params.node_size;

    #[cfg(feature = "rayon")]
    {
        let boxes_slices = boxes
            .chunks_mut(num_items_per_slice * 4)
            .collect::<Vec<_>>();
        let indices_slices = indices.chunks_mut(num_items_per_slice).collect::<Vec<_>>();

        boxes_slices
            .into_par_iter()
            .zip(indices_slices)
            .for_each(|(boxes_chunk, indices_chunk)| {
                // The last slice may not be a full one
                let right = indices_chunk.len() - 1;
                sort(
                    boxes_chunk,
                    indices_chunk,
                    0,
                    right,
                    params.node_size,
                    Y_AXIS,
                );
            })
    }

    #[cfg(not(feature = "rayon"))]
    {
        for (boxes_chunk, indices_chunk) in boxes
            .chunks_mut(num_items_per_slice * 4)
            .zip(indices.chunks_mut(num_items_per_slice))
        {
            let right = indices_chunk.len() - 1;
            sort(
                boxes_chunk,
                indices_chunk,
                0,
                right,
                params.node_size,
                Y_AXIS,
            );
        }
    }
}

/// Quicksort on one axis that stops once a range fits inside a single node.
// Partially taken from static_aabb2d_index under the MIT/Apache license
fn sort<N: IndexableNum>(
    boxes: &mut [N],
    indices: &mut [u32],
    left: usize,
    right: usize,
    node_size: usize,
    axis: usize,
) {
    debug_assert!(left <= right);

    if left / node_size >= right / node_size {
        return;
    }

    let pivot = boxes[4 * ((left + right) / 2) + axis];
    let mut i = left.wrapping_sub(1);
    let mut j = right.wrapping_add(1);

    loop {
        loop {
            i = i.wrapping_add(1);
            if boxes[4 * i + axis] >= pivot {
                break;
            }
        }

        loop {
            j = j.wrapping_sub(1);
            if boxes[4 * j + axis] <= pivot {
                break;
            }
        }

        if i >= j {
            break;
        }

        swap(boxes, indices, i, j);
    }

    sort(boxes, indices, left, j, node_size, axis);
    sort(boxes, indices, j + 1, right, node_size, axis);
}

/// Swap two boxes and their indices.
#[inline]
fn swap<N: IndexableNum>(boxes: &mut [N], indices: &mut [u32], i: usize, j: usize) {
    let k = 4 * i;
    let m = 4 * j;
    boxes.swap(k, m);
    boxes.swap(k + 1, m + 1);
    boxes.swap(k + 2, m + 2);
    boxes.swap(k + 3, m + 3);

    indices.swap(i, j);
}

#[cfg(test)]
mod test {
    use super::*;

    fn point_boxes(points: &[(i32, i32)]) -> (Vec<i32>, Vec<u32>) {
        let mut boxes = vec![];
        for &(x, y) in points {
            boxes.extend_from_slice(&[x, y, x, y]);
        }
        let indices = (0..points.len() as u32).collect();
        (boxes, indices)
    }

    #[test]
    fn keeps_boxes_and_indices_together() {
        let points: Vec<(i32, i32)> = (0..50).map(|i| ((i * 37) % 50, (i * 11) % 23)).collect();
        let (mut boxes, mut indices) = point_boxes(&points);
        let params = SortParams {
            num_items: points.len(),
            node_size: 4,
        };
        str_sort(&params, &mut boxes, &mut indices);

        for (pos, index) in indices.iter().enumerate() {
            let (x, y) = points[*index as usize];
            assert_eq!(&boxes[4 * pos..4 * pos + 4], &[x, y, x, y]);
        }

        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn slices_are_ordered_by_x() {
        let points: Vec<(i32, i32)> = (0..64).map(|i| (63 - i, i % 7)).collect();
        let (mut boxes, mut indices) = point_boxes(&points);
        let params = SortParams {
            num_items: points.len(),
            node_size: 4,
        };
        str_sort(&params, &mut boxes, &mut indices);

        // 16 leaves give 4 slices of 16 items each
        let slice_max = |s: usize| (s * 16..(s + 1) * 16).map(|i| boxes[4 * i]).max().unwrap();
        let slice_min = |s: usize| (s * 16..(s + 1) * 16).map(|i| boxes[4 * i]).min().unwrap();
        for s in 0..3 {
            assert!(slice_max(s) <= slice_min(s + 1));
        }
    }
}
