//! Repeated smoothing passes over a whole volume.

use std::time::Instant;

use super::decompose::{run_pass, Decomposition};
use super::energy::{InterfacialEnergy, UniformEnergy};
use super::grid::LabelVolume;
use crate::config::SmoothingConfig;
use crate::error::Result;
use crate::header::GridHeader;

/// Result of smoothing one volume.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingReport {
    pub volume: LabelVolume,
    /// Largest label after smoothing.
    pub microstructures: u32,
    /// Whether that differs from the count claimed by the header.
    pub changed: bool,
}

/// Owns the configuration, the energy model and the worker pool.
pub struct GrainGrowth<E = UniformEnergy> {
    config: SmoothingConfig,
    energy: E,
    thread_pool: rayon::ThreadPool,
    passes_completed: u64,
}

impl GrainGrowth<UniformEnergy> {
    /// Engine with uniform interfacial energy.
    pub fn new(config: SmoothingConfig) -> Result<Self> {
        GrainGrowth::with_energy(config, UniformEnergy)
    }
}

impl<E: InterfacialEnergy> GrainGrowth<E> {
    /// Engine with a caller-supplied energy model. The pool gets one thread
    /// per tile.
    pub fn with_energy(config: SmoothingConfig, energy: E) -> Result<Self> {
        config.validate()?;
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .build()?;

        Ok(GrainGrowth {
            config,
            energy,
            thread_pool,
            passes_completed: 0,
        })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Passes run by this engine so far, across all volumes.
    pub fn passes_completed(&self) -> u64 {
        self.passes_completed
    }

    pub fn set_stationary<I: IntoIterator<Item = u32>>(&mut self, ids: I) {
        self.config.stationary = ids.into_iter().collect();
    }

    pub fn add_stationary(&mut self, id: u32) {
        self.config.stationary.insert(id);
    }

    /// Run every configured pass over `volume` and return the new labels.
    pub fn smooth(&mut self, volume: &LabelVolume) -> Result<LabelVolume> {
        let decomposition = Decomposition::new(
            volume.dims,
            self.config.processors,
            self.config.window(),
        )?;
        log::debug!(
            "smoothing {:?} voxels in {} tiles of {:?} (+{} halo), {} passes",
            volume.dims,
            decomposition.tile_count(),
            decomposition.stride,
            decomposition.halo,
            self.config.iterations
        );

        let mut current = volume.clone();
        for pass in 0..self.config.iterations {
            let started = Instant::now();
            current = run_pass(
                &self.thread_pool,
                &current,
                &decomposition,
                &self.config,
                &self.energy,
            );
            self.passes_completed += 1;
            log::debug!("pass {} done in {:?}", pass + 1, started.elapsed());
        }
        Ok(current)
    }

    /// Validate the header, smooth its volume and recount the grains.
    pub fn run(&mut self, header: &GridHeader, volume: &LabelVolume) -> Result<SmoothingReport> {
        header.log_summary();
        header.validate()?;
        let volume = LabelVolume::from_cells(header.grid, volume.cells.clone())?;

        let smoothed = self.smooth(&volume)?;
        let microstructures = smoothed.max_label();
        let changed = microstructures != header.microstructures;
        if changed {
            log::info!("--> microstructures: {}", microstructures);
        }

        Ok(SmoothingReport {
            volume: smoothed,
            microstructures,
            changed,
        })
    }
}
