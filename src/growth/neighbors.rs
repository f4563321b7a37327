//! Neighbor discovery by binary dilation.
//!
//! The 3×3×3 structuring element (26-connectivity) is separable, so the
//! dilation runs as one 3-wide pass per axis:
//! - X pass: a voxel is set if it or its x-neighbors are set
//! - Y pass on the X result, then Z pass on the Y result
//! - Voxels outside the window count as unset (no wrap inside a window)

use std::collections::BTreeSet;

use super::grid::{index_of, Dims, LabelVolume};

/// Indicator mask of `grain` over `window`.
pub fn grain_mask(window: &LabelVolume, grain: u32) -> Vec<bool> {
    window.cells.iter().map(|&c| c == grain).collect()
}

/// Dilate a mask with the full 3×3×3 cube.
pub fn dilate(mask: &[bool], dims: Dims) -> Vec<bool> {
    let mut current = mask.to_vec();
    for axis in 0..3 {
        current = dilate_axis(&current, dims, axis);
    }
    current
}

fn dilate_axis(mask: &[bool], dims: Dims, axis: usize) -> Vec<bool> {
    let mut out = mask.to_vec();
    for z in 0..dims[2] {
        for y in 0..dims[1] {
            for x in 0..dims[0] {
                let p = [x, y, z];
                if !mask[index_of(dims, x, y, z)] {
                    continue;
                }
                // Spread this voxel to its two neighbors along `axis`
                if p[axis] > 0 {
                    let mut q = p;
                    q[axis] -= 1;
                    out[index_of(dims, q[0], q[1], q[2])] = true;
                }
                if p[axis] + 1 < dims[axis] {
                    let mut q = p;
                    q[axis] += 1;
                    out[index_of(dims, q[0], q[1], q[2])] = true;
                }
            }
        }
    }
    out
}

/// Grains touching `grain` inside `window`.
///
/// Excludes the grain itself, the reserved label 0 and every ID for which
/// `is_stationary` returns true.
pub fn find_neighbors<F>(window: &LabelVolume, grain: u32, is_stationary: F) -> BTreeSet<u32>
where
    F: Fn(u32) -> bool,
{
    let mask = grain_mask(window, grain);
    let dilated = dilate(&mask, window.dims);

    window
        .cells
        .iter()
        .zip(dilated.iter())
        .filter(|&(_, &hit)| hit)
        .map(|(&label, _)| label)
        .filter(|&label| label != grain && label != 0 && !is_stationary(label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilate_single_voxel_fills_cube() {
        let dims = [5, 5, 5];
        let mut mask = vec![false; 125];
        mask[index_of(dims, 2, 2, 2)] = true;

        let dilated = dilate(&mask, dims);

        assert_eq!(dilated.iter().filter(|&&b| b).count(), 27);
        // Corner of the 3×3×3 cube is reached (26-connectivity)
        assert!(dilated[index_of(dims, 1, 1, 1)]);
        assert!(dilated[index_of(dims, 3, 3, 3)]);
        assert!(!dilated[index_of(dims, 0, 2, 2)]);
        assert!(!dilated[index_of(dims, 4, 4, 4)]);
    }

    #[test]
    fn test_dilate_clips_at_window_edge() {
        let dims = [3, 3, 3];
        let mut mask = vec![false; 27];
        mask[index_of(dims, 0, 0, 0)] = true;

        let dilated = dilate(&mask, dims);

        assert_eq!(dilated.iter().filter(|&&b| b).count(), 8);
        assert!(!dilated[index_of(dims, 2, 2, 2)]);
    }

    #[test]
    fn test_find_neighbors_includes_diagonal_contact() {
        let mut window = LabelVolume::new([4, 4, 4]);
        window.cells.iter_mut().for_each(|c| *c = 9);
        window.set(1, 1, 1, 1);
        window.set(2, 2, 2, 2); // diagonal only
        window.set(0, 1, 1, 3); // face contact

        let neighbors = find_neighbors(&window, 1, |_| false);
        assert_eq!(neighbors.into_iter().collect::<Vec<_>>(), vec![2, 3, 9]);
    }

    #[test]
    fn test_find_neighbors_excludes_stationary_and_zero() {
        let mut window = LabelVolume::new([3, 1, 1]);
        window.cells = vec![5, 1, 0];

        assert!(find_neighbors(&window, 1, |g| g == 5).is_empty());
        assert_eq!(
            find_neighbors(&window, 1, |_| false)
                .into_iter()
                .collect::<Vec<_>>(),
            vec![5]
        );
    }

    #[test]
    fn test_find_neighbors_ignores_distant_grains() {
        let window = LabelVolume::from_fn([6, 1, 1], |x, _, _| match x {
            0 | 1 => 1,
            2 => 2,
            _ => 3,
        });
        let neighbors = find_neighbors(&window, 1, |_| false);
        assert_eq!(neighbors.into_iter().collect::<Vec<_>>(), vec![2]);
    }
}
