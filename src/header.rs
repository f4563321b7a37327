//! Geometry header that travels with a label volume.

use crate::error::{GrowthError, Result, AXES};
use crate::growth::grid::Dims;

/// Grid header owned by the caller. The engine only reads it, apart from
/// reporting a recomputed `microstructures` count.
#[derive(Clone, Debug, PartialEq)]
pub struct GridHeader {
    pub grid: Dims,
    pub size: [f64; 3],
    pub origin: [f64; 3],
    pub homogenization: i32,
    pub microstructures: u32,
}

impl GridHeader {
    /// Header with unit voxel spacing and the origin at zero.
    pub fn with_grid(grid: Dims) -> Self {
        GridHeader {
            grid,
            size: [grid[0] as f64, grid[1] as f64, grid[2] as f64],
            origin: [0.0; 3],
            homogenization: 1,
            microstructures: 0,
        }
    }

    /// Reject grids with an empty axis and non-positive physical extents.
    pub fn validate(&self) -> Result<()> {
        for axis in 0..3 {
            if self.grid[axis] < 1 {
                return Err(GrowthError::InvalidGrid {
                    axis: AXES[axis],
                    value: self.grid[axis],
                });
            }
        }
        for axis in 0..3 {
            // `!(v > 0)` also rejects NaN
            if !(self.size[axis] > 0.0) {
                return Err(GrowthError::InvalidSize {
                    axis: AXES[axis],
                    value: self.size[axis],
                });
            }
        }
        Ok(())
    }

    /// Number of voxels described by the grid.
    pub fn voxel_count(&self) -> usize {
        self.grid.iter().product()
    }

    /// Echo the header the way the preprocessing tools print it.
    pub fn log_summary(&self) {
        log::info!(
            "grid     a b c:  {} x {} x {}",
            self.grid[0],
            self.grid[1],
            self.grid[2]
        );
        log::info!(
            "size     x y z:  {} x {} x {}",
            self.size[0],
            self.size[1],
            self.size[2]
        );
        log::info!(
            "origin   x y z:  {} : {} : {}",
            self.origin[0],
            self.origin[1],
            self.origin[2]
        );
        log::info!("homogenization:  {}", self.homogenization);
        log::info!("microstructures: {}", self.microstructures);
    }
}
