//! Grain Coarsen - curvature-driven smoothing of voxel microstructures
//!
//! Each grain's indicator is diffused with a Gaussian kernel, grains compete
//! at interfaces and triple junctions, and every voxel goes to the grain with
//! the highest resolved concentration. The periodic domain is split into
//! haloed tiles that are processed in parallel.
//!
//! A C ABI for host tools lives in `ffi`.

pub mod config;
pub mod error;
pub mod ffi;
pub mod growth;
pub mod header;


pub use config::SmoothingConfig;
pub use error::{GrowthError, Result};
pub use growth::{EnergyTable, GrainGrowth, InterfacialEnergy, LabelVolume, SmoothingReport, UniformEnergy};
pub use header::GridHeader;
