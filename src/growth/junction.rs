//! Competition of a grain against its neighbors.
//!
//! A grain with one neighbor sits on a plain two-grain interface and its
//! diffused field is rescaled by the interface energy. A grain with several
//! neighbors may sit on triple junctions: every pair of neighbors forms a
//! candidate junction, and the grain's field is the average of the
//! per-junction fields weighted by how strongly the three grains overlap.

use std::collections::BTreeSet;

use super::energy::{junction_speed, InterfacialEnergy};

/// Added to every diffused field before it is used as a weight.
pub const BIAS: f64 = 0.001;

/// A neighbor pair takes part only if its weight exceeds this somewhere.
pub const ACTIVITY_THRESHOLD: f64 = 0.01;

/// How a grain's field was resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// No neighbors: the plain diffused field.
    Isolated,
    /// One neighbor: diffusion rescaled by the interface speed.
    Interface { speed: f64 },
    /// Several neighbors with at least one active pair.
    Junction { active_pairs: usize },
    /// Several neighbors but no active pair; fell back to the diffused field.
    MissingBoundaryData,
}

/// `speed * diffused + (1 - speed) * mask`, elementwise.
pub fn blend(speed: f64, diffused: &[f64], mask: &[f64]) -> Vec<f64> {
    diffused
        .iter()
        .zip(mask)
        .map(|(&d, &m)| speed * d + (1.0 - speed) * m)
        .collect()
}

/// Resolve the field of `grain` over its box.
///
/// `diffused` and `mask` are the grain's own blurred and sharp indicators.
/// `weight_of(n)` must return neighbor `n`'s diffused field on this box
/// plus [`BIAS`] (just [`BIAS`] where the neighbor was never diffused); it is
/// only called when there are at least two neighbors.
pub fn resolve<E, W>(
    grain: u32,
    neighbors: &BTreeSet<u32>,
    diffused: &[f64],
    mask: &[f64],
    energy: &E,
    mut weight_of: W,
) -> (Vec<f64>, Outcome)
where
    E: InterfacialEnergy + ?Sized,
    W: FnMut(u32) -> Vec<f64>,
{
    let ids: Vec<u32> = neighbors.iter().copied().collect();

    match ids.len() {
        0 => (diffused.to_vec(), Outcome::Isolated),
        1 => {
            let speed = energy.energy(grain, ids[0]);
            (blend(speed, diffused, mask), Outcome::Interface { speed })
        }
        _ => {
            let own: Vec<f64> = diffused.iter().map(|&d| d + BIAS).collect();
            let weights: Vec<Vec<f64>> = ids.iter().map(|&n| weight_of(n)).collect();

            let mut numerator = vec![0.0; diffused.len()];
            let mut denominator = vec![0.0; diffused.len()];
            let mut active_pairs = 0;

            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let pair: Vec<f64> = weights[i]
                        .iter()
                        .zip(&weights[j])
                        .map(|(&a, &b)| a * b)
                        .collect();
                    if !pair.iter().any(|&w| w > ACTIVITY_THRESHOLD) {
                        continue;
                    }
                    active_pairs += 1;

                    let speed = junction_speed(energy, grain, ids[i], ids[j]);
                    for v in 0..pair.len() {
                        let w = pair[v] * own[v];
                        numerator[v] += w * (speed * diffused[v] + (1.0 - speed) * mask[v]);
                        denominator[v] += w;
                    }
                }
            }

            if active_pairs == 0 {
                return (diffused.to_vec(), Outcome::MissingBoundaryData);
            }

            let resolved = numerator
                .iter()
                .zip(&denominator)
                .map(|(&n, &d)| n / d)
                .collect();
            (resolved, Outcome::Junction { active_pairs })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::energy::{EnergyTable, UniformEnergy};
    use approx::assert_abs_diff_eq;

    fn set(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_isolated_keeps_diffused() {
        let diffused = vec![0.2, 0.9, 0.4];
        let mask = vec![0.0, 1.0, 0.0];
        let (field, outcome) = resolve(1, &set(&[]), &diffused, &mask, &UniformEnergy, |_| {
            panic!("no weights needed")
        });
        assert_eq!(outcome, Outcome::Isolated);
        assert_eq!(field, diffused);
    }

    #[test]
    fn test_interface_rescales_by_energy() {
        let diffused = vec![0.25, 0.75];
        let mask = vec![0.0, 1.0];
        let energy = EnergyTable::default().with(1, 2, 0.5);

        let (field, outcome) = resolve(1, &set(&[2]), &diffused, &mask, &energy, |_| {
            panic!("no weights needed")
        });

        assert_eq!(outcome, Outcome::Interface { speed: 0.5 });
        assert_abs_diff_eq!(field[0], 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(field[1], 0.875, epsilon = 1e-15);
    }

    #[test]
    fn test_unit_energy_interface_is_plain_diffusion() {
        let diffused = vec![0.1, 0.6, 0.3];
        let mask = vec![0.0, 1.0, 1.0];
        let (field, _) = resolve(3, &set(&[4]), &diffused, &mask, &UniformEnergy, |_| Vec::new());
        assert_eq!(field, diffused);
    }

    #[test]
    fn test_inactive_pairs_fall_back() {
        let diffused = vec![0.3, 0.7];
        let mask = vec![0.0, 1.0];
        let (field, outcome) = resolve(1, &set(&[2, 3]), &diffused, &mask, &UniformEnergy, |_| {
            vec![BIAS, BIAS]
        });
        assert_eq!(outcome, Outcome::MissingBoundaryData);
        assert_eq!(field, diffused);
    }

    #[test]
    fn test_single_active_pair_cancels_weights() {
        let diffused = vec![0.2, 0.8];
        let mask = vec![0.0, 1.0];
        let energy = EnergyTable::default().with(2, 3, 2.0);

        // Grain 1 between 2 and 3: speed = 1 + 1 - 2 = 0, so the sharp mask wins
        let (field, outcome) = resolve(1, &set(&[2, 3]), &diffused, &mask, &energy, |n| {
            if n == 2 {
                vec![0.5, 0.3]
            } else {
                vec![0.4, 0.2]
            }
        });

        assert_eq!(outcome, Outcome::Junction { active_pairs: 1 });
        assert_eq!(field, vec![0.0, 1.0]);
    }

    #[test]
    fn test_weighted_average_over_pairs() {
        let diffused = vec![0.5];
        let mask = vec![1.0];
        // speeds: (2,3) -> 1, (2,4) -> 0, (3,4) -> 1
        let energy = EnergyTable::default().with(2, 4, 2.0);
        let weights = |n: u32| match n {
            2 => vec![0.2],
            3 => vec![0.1],
            _ => vec![0.4],
        };

        let (field, outcome) = resolve(1, &set(&[2, 3, 4]), &diffused, &mask, &energy, weights);

        assert_eq!(outcome, Outcome::Junction { active_pairs: 3 });
        // Pair weights 0.02, 0.08, 0.04 (own weight cancels), fields 0.5, 1.0, 0.5
        let expected = (0.02 * 0.5 + 0.08 * 1.0 + 0.04 * 0.5) / (0.02 + 0.08 + 0.04);
        assert_abs_diff_eq!(field[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_pair_below_threshold_is_skipped() {
        let diffused = vec![0.5];
        let mask = vec![1.0];
        let energy = EnergyTable::default().with(2, 4, 2.0);
        // (2,3) product 0.005 is inactive; only (2,4) and (3,4) count
        let weights = |n: u32| match n {
            2 => vec![0.05],
            3 => vec![0.1],
            _ => vec![0.5],
        };

        let (field, outcome) = resolve(1, &set(&[2, 3, 4]), &diffused, &mask, &energy, weights);

        assert_eq!(outcome, Outcome::Junction { active_pairs: 2 });
        let expected = (0.025 * 1.0 + 0.05 * 0.5) / (0.025 + 0.05);
        assert_abs_diff_eq!(field[0], expected, epsilon = 1e-12);
    }
}
