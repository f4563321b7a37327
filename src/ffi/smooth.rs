//! In-place smoothing of a caller-owned label buffer.

use crate::growth::{GrainGrowth, LabelVolume};

/// Smooths a label volume in place.
///
/// Buffer layout: z,y,x order (x changes fastest), `nx * ny * nz` labels.
///
/// # Safety
/// - `ptr` must be a valid engine pointer from `gg_create()`, or null
/// - `labels` must point to at least `nx * ny * nz` writable u32 values
///
/// # Returns
/// The largest label after smoothing (the new grain count), -1 on a null
/// pointer, or the negative code of the validation error. The buffer is left
/// untouched on error.
#[no_mangle]
pub unsafe extern "C" fn gg_smooth(
    ptr: *mut GrainGrowth,
    labels: *mut u32,
    nx: u32,
    ny: u32,
    nz: u32,
) -> i64 {
    if ptr.is_null() || labels.is_null() {
        return -1;
    }

    let engine = &mut *ptr;
    let dims = [nx as usize, ny as usize, nz as usize];
    let len = dims[0] * dims[1] * dims[2];

    let buf = std::slice::from_raw_parts_mut(labels, len);
    let volume = match LabelVolume::from_cells(dims, buf.to_vec()) {
        Ok(v) => v,
        Err(err) => return err.code(),
    };

    match engine.smooth(&volume) {
        Ok(smoothed) => {
            buf.copy_from_slice(&smoothed.cells);
            smoothed.max_label() as i64
        }
        Err(err) => err.code(),
    }
}
