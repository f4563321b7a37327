//! Core grain-growth logic.
//!
//! This module contains the label grid, per-grain diffusion, junction
//! resolution, tile workers, domain decomposition and the pass driver.
//! The FFI layer in `ffi/` calls into the driver.

pub mod bounds;
pub mod decompose;
pub mod driver;
pub mod energy;
pub mod field;
pub mod grid;
pub mod junction;
pub mod neighbors;
pub mod region;
pub mod tile;

pub use bounds::{find_objects, BoundingBox};
pub use decompose::{run_pass, Decomposition, TileCoord};
pub use driver::{GrainGrowth, SmoothingReport};
pub use energy::{junction_speed, EnergyTable, InterfacialEnergy, UniformEnergy};
pub use field::ScalarField;
pub use grid::{index_of, Dims, LabelVolume};
pub use junction::{resolve, Outcome};
pub use neighbors::find_neighbors;
pub use tile::{DiffusionCache, TileWorker};
