//! Floating-point fields and separable Gaussian diffusion.
//!
//! Diffusion of a grain's indicator is a Gaussian blur applied one axis at
//! a time:
//! - Process each axis independently (X, Y, Z)
//! - Each line along the axis is convolved with a normalized 1D kernel
//! - Lines are mirrored at the box faces ("reflect": d c b a | a b c d)
//! - The result of one axis is the input of the next

use super::grid::{index_of, Dims};

/// Kernels are truncated this many standard deviations from the center.
pub const TRUNCATE: f64 = 4.0;

/// A 3D field of f64 values over a box.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    pub dims: Dims,
    pub values: Vec<f64>,
}

impl ScalarField {
    /// Cast a boolean mask to 0/1 values.
    pub fn from_mask(mask: &[bool], dims: Dims) -> Self {
        ScalarField {
            dims,
            values: mask.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.values[index_of(self.dims, x, y, z)]
    }

    /// Gaussian blur with standard deviation `sigma` voxels.
    pub fn gaussian(&self, sigma: f64) -> ScalarField {
        let kernel = gaussian_kernel(sigma);
        let mut values = self.values.clone();
        for axis in 0..3 {
            values = convolve_axis(&values, self.dims, axis, &kernel);
        }
        ScalarField {
            dims: self.dims,
            values,
        }
    }
}

/// Normalized Gaussian weights for offsets `-r..=r`, `r = round(4σ)`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|k| (-((k * k) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range index back into `0..n` by mirroring at the edges.
#[inline]
pub fn reflect(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Convolve every line along `axis` with `kernel`.
fn convolve_axis(values: &[f64], dims: Dims, axis: usize, kernel: &[f64]) -> Vec<f64> {
    let len = dims[axis];
    if len == 0 {
        return values.to_vec();
    }
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0.0; values.len()];
    let mut line = vec![0.0; len];

    // Lines run along `axis`; iterate over the other two axes.
    let (a, b) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    for j in 0..dims[b] {
        for i in 0..dims[a] {
            let at = |t: usize| {
                let mut p = [0usize; 3];
                p[axis] = t;
                p[a] = i;
                p[b] = j;
                index_of(dims, p[0], p[1], p[2])
            };

            for (t, slot) in line.iter_mut().enumerate() {
                *slot = values[at(t)];
            }

            for t in 0..len {
                let mut acc = 0.0;
                for (k, w) in kernel.iter().enumerate() {
                    let src = reflect(t as isize + k as isize - radius, len);
                    acc += w * line[src];
                }
                out[at(t)] = acc;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::grid::cell_count;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_shape() {
        let kernel = gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 9);
        assert_abs_diff_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        // Symmetric and peaked at the center
        for k in 0..4 {
            assert_abs_diff_eq!(kernel[k], kernel[8 - k], epsilon = 1e-15);
            assert!(kernel[k] < kernel[k + 1]);
        }
        assert_abs_diff_eq!(kernel[4], 0.398_942, epsilon = 1e-5);

        assert_eq!(gaussian_kernel(2.0).len(), 17);
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
    }

    #[test]
    fn test_reflect() {
        // d c b a | a b c d | d c b a
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(-4, 4), 3);
        assert_eq!(reflect(-5, 4), 3);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(8, 4), 0);
        assert_eq!(reflect(2, 4), 2);
        assert_eq!(reflect(-3, 1), 0);
        assert_eq!(reflect(7, 1), 0);
    }

    #[test]
    fn test_constant_field_unchanged() {
        let dims = [5, 3, 7];
        let field = ScalarField::from_mask(&vec![true; cell_count(dims)], dims);
        let blurred = field.gaussian(1.0);
        for v in blurred.values {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_point_source_spreads_symmetric() {
        let dims = [11, 11, 11];
        let mut mask = vec![false; cell_count(dims)];
        mask[index_of(dims, 5, 5, 5)] = true;

        let blurred = ScalarField::from_mask(&mask, dims).gaussian(1.0);

        let center = blurred.get(5, 5, 5);
        let w0 = gaussian_kernel(1.0)[4];
        assert_abs_diff_eq!(center, w0 * w0 * w0, epsilon = 1e-12);
        assert_abs_diff_eq!(blurred.get(4, 5, 5), blurred.get(6, 5, 5), epsilon = 1e-15);
        assert_abs_diff_eq!(blurred.get(5, 4, 5), blurred.get(5, 5, 6), epsilon = 1e-15);
        assert!(blurred.get(4, 5, 5) < center);

        // Mass is preserved away from the faces
        let total: f64 = blurred.values.iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_blur_bounded_by_unit_interval() {
        let dims = [6, 4, 5];
        let mask: Vec<bool> = (0..cell_count(dims)).map(|i| i % 3 == 0).collect();
        let blurred = ScalarField::from_mask(&mask, dims).gaussian(1.0);
        assert!(blurred.values.iter().all(|&v| (0.0..=1.0 + 1e-12).contains(&v)));
    }
}
