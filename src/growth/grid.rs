//! Dense label volume and index helpers.

use std::collections::BTreeSet;

use crate::error::{GrowthError, Result, AXES};

/// Extent along x, y, z.
pub type Dims = [usize; 3];

/// A dense 3D array of grain labels.
///
/// Cells are stored in z,y,x order (z changes slowest, x changes fastest).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelVolume {
    pub dims: Dims,
    pub cells: Vec<u32>,
}

/// Calculate the linear index for a 3D coordinate.
#[inline]
pub fn index_of(dims: Dims, x: usize, y: usize, z: usize) -> usize {
    z * dims[1] * dims[0] + y * dims[0] + x
}

/// Number of cells in a box of the given extent.
#[inline]
pub fn cell_count(dims: Dims) -> usize {
    dims[0] * dims[1] * dims[2]
}

/// Wrap a signed coordinate onto a periodic axis of length `n`.
#[inline]
pub fn wrap(coord: isize, n: usize) -> usize {
    coord.rem_euclid(n as isize) as usize
}

impl LabelVolume {
    /// Volume of the given extent filled with label 0.
    pub fn new(dims: Dims) -> Self {
        LabelVolume {
            dims,
            cells: vec![0; cell_count(dims)],
        }
    }

    /// Wrap a flat x-fastest label buffer. Every axis must hold at least one
    /// voxel and the buffer must cover the grid exactly.
    pub fn from_cells(dims: Dims, cells: Vec<u32>) -> Result<Self> {
        for axis in 0..3 {
            if dims[axis] < 1 {
                return Err(GrowthError::InvalidGrid {
                    axis: AXES[axis],
                    value: dims[axis],
                });
            }
        }
        let expected = cell_count(dims);
        if cells.len() != expected {
            return Err(GrowthError::LabelCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(LabelVolume { dims, cells })
    }

    /// Build a volume by evaluating `f(x, y, z)` at every voxel.
    pub fn from_fn<F: FnMut(usize, usize, usize) -> u32>(dims: Dims, mut f: F) -> Self {
        let mut cells = Vec::with_capacity(cell_count(dims));
        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    cells.push(f(x, y, z));
                }
            }
        }
        LabelVolume { dims, cells }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        index_of(self.dims, x, y, z)
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.dims[0] && y < self.dims[1] && z < self.dims[2]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.cells[self.index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, label: u32) {
        let idx = self.index(x, y, z);
        self.cells[idx] = label;
    }

    /// Read a voxel treating every axis as periodic.
    #[inline]
    pub fn get_periodic(&self, x: isize, y: isize, z: isize) -> u32 {
        self.get(
            wrap(x, self.dims[0]),
            wrap(y, self.dims[1]),
            wrap(z, self.dims[2]),
        )
    }

    /// Largest label present, which the header reports as the grain count.
    pub fn max_label(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Distinct labels in ascending order.
    pub fn distinct_labels(&self) -> BTreeSet<u32> {
        self.cells.iter().copied().collect()
    }

    /// Number of voxels carrying `label`.
    pub fn count_label(&self, label: u32) -> usize {
        self.cells.iter().filter(|&&c| c == label).count()
    }
}
