//! Region extraction and import operations.

use super::bounds::BoundingBox;
use super::grid::{index_of, wrap, Dims, LabelVolume};

/// Extract a box of extent `dims` whose lower corner sits at `origin`,
/// wrapping every coordinate onto the periodic volume.
///
/// This is the same window one gets by replicating the volume 3×3×3 and
/// cropping, but it keeps working when the window reaches further than one
/// period past the domain.
pub fn extract_periodic(volume: &LabelVolume, origin: [isize; 3], dims: Dims) -> LabelVolume {
    // Wrapped source coordinates per axis, computed once.
    let xs: Vec<usize> = (0..dims[0])
        .map(|i| wrap(origin[0] + i as isize, volume.dims[0]))
        .collect();
    let ys: Vec<usize> = (0..dims[1])
        .map(|i| wrap(origin[1] + i as isize, volume.dims[1]))
        .collect();
    let zs: Vec<usize> = (0..dims[2])
        .map(|i| wrap(origin[2] + i as isize, volume.dims[2]))
        .collect();

    let mut out = LabelVolume::new(dims);
    let mut offset = 0;
    for &z in &zs {
        for &y in &ys {
            for &x in &xs {
                out.cells[offset] = volume.get(x, y, z);
                offset += 1;
            }
        }
    }
    out
}

/// Copy the voxels of `bbox` out of `volume`. The box must lie inside it.
pub fn extract_block(volume: &LabelVolume, bbox: &BoundingBox) -> LabelVolume {
    let dims = bbox.dims();
    let mut out = LabelVolume::new(dims);

    let mut offset = 0;
    for z in bbox.min[2]..bbox.max[2] {
        for y in bbox.min[1]..bbox.max[1] {
            let row = volume.index(bbox.min[0], y, z);
            out.cells[offset..offset + dims[0]].copy_from_slice(&volume.cells[row..row + dims[0]]);
            offset += dims[0];
        }
    }
    out
}

/// Crop `margin` voxels from every face of `volume`.
pub fn crop(volume: &LabelVolume, margin: usize) -> LabelVolume {
    let bbox = BoundingBox {
        min: [margin; 3],
        max: [
            volume.dims[0].saturating_sub(margin).max(margin),
            volume.dims[1].saturating_sub(margin).max(margin),
            volume.dims[2].saturating_sub(margin).max(margin),
        ],
    };
    extract_block(volume, &bbox)
}

/// Write `block` into `target` with its lower corner at `origin`.
///
/// Voxels that would land outside `target` are skipped.
///
/// # Returns
/// Number of voxels written.
pub fn import_block(target: &mut LabelVolume, origin: [usize; 3], block: &LabelVolume) -> u64 {
    let max_x = (origin[0] + block.dims[0]).min(target.dims[0]);
    let max_y = (origin[1] + block.dims[1]).min(target.dims[1]);
    let max_z = (origin[2] + block.dims[2]).min(target.dims[2]);

    // Handle empty regions
    if origin[0] >= max_x || origin[1] >= max_y || origin[2] >= max_z {
        return 0;
    }

    let width = max_x - origin[0];
    let mut written = 0u64;
    for z in origin[2]..max_z {
        for y in origin[1]..max_y {
            let src = index_of(block.dims, 0, y - origin[1], z - origin[2]);
            let dst = target.index(origin[0], y, z);
            target.cells[dst..dst + width].copy_from_slice(&block.cells[src..src + width]);
            written += width as u64;
        }
    }
    written
}
