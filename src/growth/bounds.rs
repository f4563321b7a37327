//! Per-grain bounding boxes.

use std::collections::BTreeMap;

use super::grid::{Dims, LabelVolume};

/// Half-open axis-aligned box `[min, max)` in voxel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl BoundingBox {
    /// Box covering an entire volume of extent `dims`.
    pub fn covering(dims: Dims) -> Self {
        BoundingBox {
            min: [0; 3],
            max: dims,
        }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        (self.min[0]..self.max[0]).contains(&x)
            && (self.min[1]..self.max[1]).contains(&y)
            && (self.min[2]..self.max[2]).contains(&z)
    }

    /// Grow by `margin` on every face, clipped to a volume of extent `dims`.
    pub fn expand(&self, margin: usize, dims: Dims) -> Self {
        BoundingBox {
            min: [
                self.min[0].saturating_sub(margin),
                self.min[1].saturating_sub(margin),
                self.min[2].saturating_sub(margin),
            ],
            max: [
                (self.max[0] + margin).min(dims[0]),
                (self.max[1] + margin).min(dims[1]),
                (self.max[2] + margin).min(dims[2]),
            ],
        }
    }

    /// Overlap of two boxes, or `None` when they are disjoint.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = self.min[axis].max(other.min[axis]);
            out.max[axis] = self.max[axis].min(other.max[axis]);
            if out.min[axis] >= out.max[axis] {
                return None;
            }
        }
        Some(out)
    }

    fn include(&mut self, x: usize, y: usize, z: usize) {
        let p = [x, y, z];
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis] + 1);
        }
    }
}

/// Minimal bounding box of every non-zero label, found in a single scan.
pub fn find_objects(volume: &LabelVolume) -> BTreeMap<u32, BoundingBox> {
    let mut boxes: BTreeMap<u32, BoundingBox> = BTreeMap::new();

    let mut offset = 0;
    for z in 0..volume.dims[2] {
        for y in 0..volume.dims[1] {
            for x in 0..volume.dims[0] {
                let label = volume.cells[offset];
                offset += 1;
                if label == 0 {
                    continue;
                }
                boxes
                    .entry(label)
                    .and_modify(|b| b.include(x, y, z))
                    .or_insert(BoundingBox {
                        min: [x, y, z],
                        max: [x + 1, y + 1, z + 1],
                    });
            }
        }
    }

    boxes
}
