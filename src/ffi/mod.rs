//! C FFI layer for host tools.
//!
//! This module exports C ABI functions so the table reader/writer that owns
//! the geometry file can hand its label buffer to the engine.
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `growth` module. These functions are thin
//! wrappers that handle null checks, pointer safety, and error codes.

pub mod lifecycle;
pub mod smooth;

pub use lifecycle::{
    gg_add_stationary, gg_clear_stationary, gg_create, gg_destroy, gg_passes_completed,
};
pub use smooth::gg_smooth;
