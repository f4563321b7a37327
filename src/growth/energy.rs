//! Interfacial energy between grain pairs.

use std::collections::HashMap;

/// Symmetric pairwise interfacial energy, `energy(a, b) == energy(b, a)`.
///
/// Implemented for plain closures so callers can pass `|a, b| ...`.
pub trait InterfacialEnergy: Sync {
    fn energy(&self, a: u32, b: u32) -> f64;
}

/// Uniform energy of 1.0 between every pair of grains.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformEnergy;

impl InterfacialEnergy for UniformEnergy {
    fn energy(&self, _a: u32, _b: u32) -> f64 {
        1.0
    }
}

impl<F> InterfacialEnergy for F
where
    F: Fn(u32, u32) -> f64 + Sync,
{
    fn energy(&self, a: u32, b: u32) -> f64 {
        self(a, b)
    }
}

/// Lookup table of pair energies with a fallback for unlisted pairs.
#[derive(Clone, Debug)]
pub struct EnergyTable {
    default: f64,
    pairs: HashMap<(u32, u32), f64>,
}

impl EnergyTable {
    pub fn new(default: f64) -> Self {
        EnergyTable {
            default,
            pairs: HashMap::new(),
        }
    }

    /// Set the energy of the boundary between `a` and `b` (order irrelevant).
    pub fn set(&mut self, a: u32, b: u32, energy: f64) {
        self.pairs.insert(key(a, b), energy);
    }

    pub fn with(mut self, a: u32, b: u32, energy: f64) -> Self {
        self.set(a, b, energy);
        self
    }
}

impl Default for EnergyTable {
    fn default() -> Self {
        EnergyTable::new(1.0)
    }
}

impl InterfacialEnergy for EnergyTable {
    fn energy(&self, a: u32, b: u32) -> f64 {
        self.pairs.get(&key(a, b)).copied().unwrap_or(self.default)
    }
}

#[inline]
fn key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Velocity of the triple junction between `grain`, `a` and `b`:
/// `E(grain, a) + E(grain, b) - E(a, b)`.
pub fn junction_speed<E: InterfacialEnergy + ?Sized>(energy: &E, grain: u32, a: u32, b: u32) -> f64 {
    energy.energy(grain, a) + energy.energy(grain, b) - energy.energy(a, b)
}
