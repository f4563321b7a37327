//! Grain coarsening inside one haloed tile.
//!
//! Core invariant: every grain's field is a pure function of the tile labels
//! at pass start. Labels are only read from the input tile and only written
//! to the output tile, and a voxel goes to the grain with the highest
//! concentration there (the smaller ID on an exact tie), so the order in
//! which grains are processed does not affect the result.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::bounds::{find_objects, BoundingBox};
use super::energy::InterfacialEnergy;
use super::field::ScalarField;
use super::grid::{cell_count, index_of, LabelVolume};
use super::junction::{resolve, BIAS};
use super::neighbors::{find_neighbors, grain_mask};
use super::region::{crop, extract_block};
use crate::config::SmoothingConfig;

/// A grain's diffused indicator over its own expanded bounding box.
#[derive(Clone, Debug)]
pub struct CachedField {
    pub bbox: BoundingBox,
    pub values: Vec<f64>,
}

/// Diffused fields of the grains seen so far in one tile.
///
/// Owned by a single [`TileWorker`] and dropped with it; nothing is shared
/// between tiles or passes.
#[derive(Debug, Default)]
pub struct DiffusionCache {
    fields: HashMap<u32, CachedField>,
}

impl DiffusionCache {
    /// Diffused field of `grain` over `bbox`, computed on first request.
    pub fn get_or_diffuse(
        &mut self,
        labels: &LabelVolume,
        grain: u32,
        bbox: BoundingBox,
        sigma: f64,
    ) -> &CachedField {
        self.fields.entry(grain).or_insert_with(|| {
            let window = extract_block(labels, &bbox);
            let mask = grain_mask(&window, grain);
            let blurred = ScalarField::from_mask(&mask, window.dims).gaussian(sigma);
            CachedField {
                bbox,
                values: blurred.values,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Coarsens every movable grain of one haloed tile.
pub struct TileWorker<'a, E: ?Sized> {
    labels: &'a LabelVolume,
    window: usize,
    sigma: f64,
    stationary: &'a BTreeSet<u32>,
    energy: &'a E,
    boxes: BTreeMap<u32, BoundingBox>,
    cache: DiffusionCache,
}

impl<'a, E: InterfacialEnergy + ?Sized> TileWorker<'a, E> {
    pub fn new(labels: &'a LabelVolume, config: &'a SmoothingConfig, energy: &'a E) -> Self {
        TileWorker {
            labels,
            window: config.window(),
            sigma: config.sigma(),
            stationary: &config.stationary,
            energy,
            boxes: find_objects(labels),
            cache: DiffusionCache::default(),
        }
    }

    /// Grains that take part in the competition, in ascending order.
    pub fn grains(&self) -> Vec<u32> {
        self.boxes
            .keys()
            .copied()
            .filter(|g| !self.stationary.contains(g))
            .collect()
    }

    /// Coarsen the tile and strip `window` voxels of halo from every face.
    pub fn run(self) -> LabelVolume {
        let window = self.window;
        let order = self.grains();
        let labels = self.coarsen(&order);
        crop(&labels, window)
    }

    /// Coarsen the whole tile, halo included, visiting grains in `order`.
    pub fn coarsen(mut self, order: &[u32]) -> LabelVolume {
        let dims = self.labels.dims;
        let mut winner = LabelVolume::new(dims);
        let mut concentration = vec![0.0; cell_count(dims)];

        // Stationary grains are fixed at full concentration
        for (i, &label) in self.labels.cells.iter().enumerate() {
            if self.stationary.contains(&label) {
                winner.cells[i] = label;
                concentration[i] = 1.0;
            }
        }

        for &grain in order {
            let Some(bbox) = self.boxes.get(&grain) else {
                continue;
            };
            let bbox = bbox.expand(self.window, dims);
            let field = self.resolve_grain(grain, bbox);

            let mut local = 0;
            for z in bbox.min[2]..bbox.max[2] {
                for y in bbox.min[1]..bbox.max[1] {
                    for x in bbox.min[0]..bbox.max[0] {
                        let idx = index_of(dims, x, y, z);
                        let value = field[local];
                        local += 1;

                        if self.stationary.contains(&self.labels.cells[idx]) {
                            continue;
                        }
                        if value > concentration[idx] {
                            winner.cells[idx] = grain;
                            concentration[idx] = value;
                        } else if value == concentration[idx] && value > 0.0 {
                            // Exact ties go to the smaller ID
                            winner.cells[idx] = grain.min(winner.cells[idx]);
                        }
                    }
                }
            }
        }

        winner
    }

    /// Resolved concentration of `grain` over its expanded box `bbox`.
    fn resolve_grain(&mut self, grain: u32, bbox: BoundingBox) -> Vec<f64> {
        let window = extract_block(self.labels, &bbox);
        let stationary = self.stationary;
        let neighbors = find_neighbors(&window, grain, |g| stationary.contains(&g));

        let mask = ScalarField::from_mask(&grain_mask(&window, grain), window.dims).values;
        let diffused = self
            .cache
            .get_or_diffuse(self.labels, grain, bbox, self.sigma)
            .values
            .clone();

        let labels = self.labels;
        let boxes = &self.boxes;
        let cache = &mut self.cache;
        let (margin, sigma) = (self.window, self.sigma);

        let (field, outcome) = resolve(grain, &neighbors, &diffused, &mask, self.energy, |n| {
            neighbor_weight(cache, labels, boxes, margin, sigma, bbox, n)
        });
        log::trace!(
            "grain {} ({} neighbors): {:?}",
            grain,
            neighbors.len(),
            outcome
        );
        field
    }
}

/// Weight of neighbor `n` over `target`: its own diffused field plus the
/// bias where the two expanded boxes overlap, the bias alone elsewhere.
fn neighbor_weight(
    cache: &mut DiffusionCache,
    labels: &LabelVolume,
    boxes: &BTreeMap<u32, BoundingBox>,
    margin: usize,
    sigma: f64,
    target: BoundingBox,
    n: u32,
) -> Vec<f64> {
    let target_dims = target.dims();
    let mut weight = vec![BIAS; cell_count(target_dims)];

    let Some(own_box) = boxes.get(&n) else {
        return weight;
    };
    let neighbor_box = own_box.expand(margin, labels.dims);
    let cached = cache.get_or_diffuse(labels, n, neighbor_box, sigma);
    let Some(common) = target.intersect(&cached.bbox) else {
        return weight;
    };

    let source_dims = cached.bbox.dims();
    for z in common.min[2]..common.max[2] {
        for y in common.min[1]..common.max[1] {
            for x in common.min[0]..common.max[0] {
                let dst = index_of(
                    target_dims,
                    x - target.min[0],
                    y - target.min[1],
                    z - target.min[2],
                );
                let src = index_of(
                    source_dims,
                    x - cached.bbox.min[0],
                    y - cached.bbox.min[1],
                    z - cached.bbox.min[2],
                );
                weight[dst] = cached.values[src] + BIAS;
            }
        }
    }
    weight
}
