//! Smoothing parameters.

use std::collections::BTreeSet;

use crate::error::{GrowthError, Result};

/// Parameters of a smoothing run.
///
/// Defaults match the preprocessing tool: distance 1, one pass, a single
/// tile, no stationary grains.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingConfig {
    /// Diffusion distance in voxels; also the Gaussian standard deviation.
    pub distance: usize,
    /// Number of curvature-flow passes.
    pub iterations: usize,
    /// Tiles per axis. Each must divide the grid along that axis.
    pub processors: [usize; 3],
    /// Grain IDs that never move and never diffuse.
    pub stationary: BTreeSet<u32>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            distance: 1,
            iterations: 1,
            processors: [1, 1, 1],
            stationary: BTreeSet::new(),
        }
    }
}

impl SmoothingConfig {
    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_processors(mut self, processors: [usize; 3]) -> Self {
        self.processors = processors;
        self
    }

    pub fn with_stationary<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
        self.stationary.extend(ids);
        self
    }

    /// Halo width around each tile and margin around each bounding box.
    #[inline]
    pub fn window(&self) -> usize {
        4 * self.distance
    }

    /// Gaussian standard deviation in voxels.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.distance as f64
    }

    /// Size of the worker pool: one worker per tile.
    pub fn worker_count(&self) -> usize {
        self.processors.iter().product()
    }

    #[inline]
    pub fn is_stationary(&self, grain: u32) -> bool {
        self.stationary.contains(&grain)
    }

    pub fn validate(&self) -> Result<()> {
        if self.distance < 1 {
            return Err(GrowthError::InvalidConfig("diffusion distance must be >= 1"));
        }
        if self.iterations < 1 {
            return Err(GrowthError::InvalidConfig("smoothing iterations must be >= 1"));
        }
        if self.processors.iter().any(|&p| p < 1) {
            return Err(GrowthError::InvalidConfig("processors per axis must be >= 1"));
        }
        Ok(())
    }
}
