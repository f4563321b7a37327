//! Engine creation, destruction, and configuration queries.

use crate::config::SmoothingConfig;
use crate::growth::GrainGrowth;

/// Creates a smoothing engine and returns an opaque pointer.
///
/// # Returns
/// A pointer to a new engine, or null if any parameter is zero or the worker
/// pool cannot be built.
///
/// # Safety
/// The returned pointer must eventually be freed with `gg_destroy()`.
#[no_mangle]
pub extern "C" fn gg_create(
    distance: u32,
    iterations: u32,
    px: u32,
    py: u32,
    pz: u32,
) -> *mut GrainGrowth {
    let config = SmoothingConfig::default()
        .with_distance(distance as usize)
        .with_iterations(iterations as usize)
        .with_processors([px as usize, py as usize, pz as usize]);

    match GrainGrowth::new(config) {
        Ok(engine) => Box::into_raw(Box::new(engine)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Destroys an engine and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `gg_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn gg_destroy(ptr: *mut GrainGrowth) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the number of smoothing passes the engine has run.
///
/// # Safety
/// - `ptr` must be a valid engine pointer, or null
///
/// # Returns
/// The pass counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn gg_passes_completed(ptr: *const GrainGrowth) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).passes_completed()
}

/// Marks a grain as stationary.
///
/// # Safety
/// - `ptr` must be a valid engine pointer, or null
///
/// # Returns
/// 0 on success, 1 on null pointer.
#[no_mangle]
pub unsafe extern "C" fn gg_add_stationary(ptr: *mut GrainGrowth, grain: u32) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    (*ptr).add_stationary(grain);
    0
}

/// Clears the stationary grain list.
///
/// # Safety
/// - `ptr` must be a valid engine pointer, or null
#[no_mangle]
pub unsafe extern "C" fn gg_clear_stationary(ptr: *mut GrainGrowth) {
    if ptr.is_null() {
        return;
    }
    (*ptr).set_stationary(std::iter::empty::<u32>());
}
