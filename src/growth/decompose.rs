//! Domain decomposition and parallel tile dispatch.
//!
//! Splits the periodic domain into a Px×Py×Pz grid of tiles, hands each tile
//! plus a halo of `window` voxels to a worker, and writes the halo-free
//! results back into a fresh volume.
//!
//! Core invariant: workers only read the immutable pass-N snapshot and each
//! returns a disjoint slab of pass N+1, so results are merged by tile
//! coordinate and completion order never matters.

use rayon::prelude::*;

use super::energy::InterfacialEnergy;
use super::grid::{Dims, LabelVolume};
use super::region::{extract_periodic, import_block};
use super::tile::TileWorker;
use crate::config::SmoothingConfig;
use crate::error::{GrowthError, Result, AXES};

/// 3D tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub ix: usize,
    pub iy: usize,
    pub iz: usize,
}

impl TileCoord {
    #[inline]
    fn axis(&self, axis: usize) -> usize {
        match axis {
            0 => self.ix,
            1 => self.iy,
            _ => self.iz,
        }
    }
}

/// Interleave bits of x, y, z to produce a Morton code.
/// Tile indices up to 2^21 per axis fit in the u64 output.
fn morton_encode(x: u32, y: u32, z: u32) -> u64 {
    fn spread_bits(v: u32) -> u64 {
        let mut x = (v as u64) & 0x1F_FFFF;
        x = (x | (x << 32)) & 0x001F_0000_0000_FFFF;
        x = (x | (x << 16)) & 0x001F_0000_FF00_00FF;
        x = (x | (x << 8)) & 0x100F_00F0_0F00_F00F;
        x = (x | (x << 4)) & 0x10C3_0C30_C30C_30C3;
        x = (x | (x << 2)) & 0x1249_2492_4924_9249;
        x
    }
    spread_bits(x) | (spread_bits(y) << 1) | (spread_bits(z) << 2)
}

/// How the grid is cut into tiles and how wide the halo is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decomposition {
    pub grid: Dims,
    pub parts: [usize; 3],
    pub stride: Dims,
    pub halo: usize,
}

impl Decomposition {
    /// Fails if `parts` does not divide `grid` evenly along every axis.
    pub fn new(grid: Dims, parts: [usize; 3], halo: usize) -> Result<Self> {
        let mut stride = [0; 3];
        for axis in 0..3 {
            if parts[axis] == 0 || grid[axis] % parts[axis] != 0 {
                return Err(GrowthError::InvalidDecomposition {
                    axis: AXES[axis],
                    grid: grid[axis],
                    parts: parts[axis],
                });
            }
            stride[axis] = grid[axis] / parts[axis];
        }
        Ok(Decomposition {
            grid,
            parts,
            stride,
            halo,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.parts.iter().product()
    }

    /// Every tile coordinate, sorted by Morton code.
    pub fn tiles(&self) -> Vec<TileCoord> {
        let mut tiles: Vec<(u64, TileCoord)> = Vec::with_capacity(self.tile_count());

        for iz in 0..self.parts[2] {
            for iy in 0..self.parts[1] {
                for ix in 0..self.parts[0] {
                    let morton = morton_encode(ix as u32, iy as u32, iz as u32);
                    tiles.push((morton, TileCoord { ix, iy, iz }));
                }
            }
        }

        tiles.sort_by_key(|&(morton, _)| morton);
        tiles.into_iter().map(|(_, coord)| coord).collect()
    }

    /// Lower corner of a tile's core in the global volume.
    pub fn core_origin(&self, tile: TileCoord) -> [usize; 3] {
        [
            tile.ix * self.stride[0],
            tile.iy * self.stride[1],
            tile.iz * self.stride[2],
        ]
    }

    /// Extent of a tile including the halo on both sides.
    pub fn padded_dims(&self) -> Dims {
        [
            self.stride[0] + 2 * self.halo,
            self.stride[1] + 2 * self.halo,
            self.stride[2] + 2 * self.halo,
        ]
    }

    /// The tile's core plus halo, read periodically from `volume`.
    pub fn extract_tile(&self, volume: &LabelVolume, tile: TileCoord) -> LabelVolume {
        let mut origin = [0isize; 3];
        for (axis, o) in origin.iter_mut().enumerate() {
            *o = (tile.axis(axis) * self.stride[axis]) as isize - self.halo as isize;
        }
        extract_periodic(volume, origin, self.padded_dims())
    }

    /// Write a halo-free tile result into its slab of `target`.
    pub fn write_back(&self, target: &mut LabelVolume, tile: TileCoord, core: &LabelVolume) {
        import_block(target, self.core_origin(tile), core);
    }
}

/// Run one smoothing pass over `volume` on `pool`.
///
/// Every tile is coarsened independently; `collect` is the barrier that ends
/// the pass.
pub fn run_pass<E>(
    pool: &rayon::ThreadPool,
    volume: &LabelVolume,
    decomposition: &Decomposition,
    config: &SmoothingConfig,
    energy: &E,
) -> LabelVolume
where
    E: InterfacialEnergy + ?Sized,
{
    let tiles = decomposition.tiles();

    let results: Vec<(TileCoord, LabelVolume)> = pool.install(|| {
        tiles
            .par_iter()
            .map(|&tile| {
                let labels = decomposition.extract_tile(volume, tile);
                let core = TileWorker::new(&labels, config, energy).run();
                (tile, core)
            })
            .collect()
    });

    let mut next = LabelVolume::new(volume.dims);
    for (tile, core) in &results {
        decomposition.write_back(&mut next, *tile, core);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morton_order() {
        assert_eq!(morton_encode(0, 0, 0), 0);
        assert_eq!(morton_encode(1, 0, 0), 1);
        assert_eq!(morton_encode(0, 1, 0), 2);
        assert_eq!(morton_encode(0, 0, 1), 4);
        assert_eq!(morton_encode(1, 1, 1), 7);
        assert_eq!(morton_encode(2, 0, 0), 8);
        assert_eq!(morton_encode(3, 3, 3), 63);
        assert_eq!(morton_encode(300, 0, 0), morton_encode(300, 0, 0));
        assert!(morton_encode(256, 0, 0) > morton_encode(255, 255, 255));
    }

    #[test]
    fn test_tiles_cover_grid_once() {
        let d = Decomposition::new([8, 6, 4], [2, 3, 1], 4).unwrap();
        let tiles = d.tiles();

        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], TileCoord { ix: 0, iy: 0, iz: 0 });
        assert_eq!(tiles[1], TileCoord { ix: 1, iy: 0, iz: 0 });
        assert_eq!(tiles[2], TileCoord { ix: 0, iy: 1, iz: 0 });

        let mut seen = std::collections::HashSet::new();
        for t in &tiles {
            assert!(seen.insert(*t));
        }
        assert_eq!(d.stride, [4, 2, 4]);
        assert_eq!(d.padded_dims(), [12, 10, 12]);
    }

    #[test]
    fn test_uneven_split_rejected() {
        assert_eq!(
            Decomposition::new([8, 6, 4], [2, 4, 1], 4),
            Err(GrowthError::InvalidDecomposition {
                axis: 'y',
                grid: 6,
                parts: 4
            })
        );
        assert!(Decomposition::new([8, 6, 4], [0, 1, 1], 4).is_err());
    }

    #[test]
    fn test_extract_tile_wraps_halo() {
        let volume = LabelVolume::from_fn([4, 4, 4], |x, y, z| (1 + x + 4 * y + 16 * z) as u32);
        let d = Decomposition::new([4, 4, 4], [2, 1, 1], 1).unwrap();

        let tile = d.extract_tile(&volume, TileCoord { ix: 0, iy: 0, iz: 0 });
        assert_eq!(tile.dims, [4, 6, 6]);
        // Halo voxel (0,0,0) of the tile is global (-1,-1,-1) = (3,3,3)
        assert_eq!(tile.get(0, 0, 0), volume.get(3, 3, 3));
        assert_eq!(tile.get(1, 1, 1), volume.get(0, 0, 0));
        assert_eq!(tile.get(3, 5, 5), volume.get(2, 0, 0));

        let tile = d.extract_tile(&volume, TileCoord { ix: 1, iy: 0, iz: 0 });
        assert_eq!(tile.get(0, 1, 1), volume.get(1, 0, 0));
        assert_eq!(tile.get(3, 1, 1), volume.get(0, 0, 0));
    }

    #[test]
    fn test_halo_wider_than_grid() {
        let volume = LabelVolume::from_fn([2, 1, 1], |x, _, _| x as u32 + 1);
        let d = Decomposition::new([2, 1, 1], [1, 1, 1], 4).unwrap();
        let tile = d.extract_tile(&volume, TileCoord { ix: 0, iy: 0, iz: 0 });

        assert_eq!(tile.dims, [10, 9, 9]);
        let row: Vec<u32> = (0..10).map(|x| tile.get(x, 4, 4)).collect();
        assert_eq!(row, vec![1, 2, 1, 2, 1, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn test_write_back_by_coordinate() {
        let d = Decomposition::new([4, 2, 2], [2, 1, 1], 0).unwrap();
        let mut target = LabelVolume::new([4, 2, 2]);

        let right = LabelVolume::from_cells([2, 2, 2], vec![2; 8]).unwrap();
        let left = LabelVolume::from_cells([2, 2, 2], vec![1; 8]).unwrap();
        // Out of order on purpose
        d.write_back(&mut target, TileCoord { ix: 1, iy: 0, iz: 0 }, &right);
        d.write_back(&mut target, TileCoord { ix: 0, iy: 0, iz: 0 }, &left);

        let expected = LabelVolume::from_fn([4, 2, 2], |x, _, _| if x < 2 { 1 } else { 2 });
        assert_eq!(target, expected);
    }
}
