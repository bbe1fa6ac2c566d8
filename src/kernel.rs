//! Normalized 2D Gaussian kernel construction.
//!
//! The kernel is square with side `k = floor(6 * sigma + 1)`. Cell `i` on either
//! axis sits at offset `i - k / 2` from the centre, and its raw weight is proportional
//! to the 1D Gaussian evaluated at the Euclidean distance of the cell from the centre.
//! Raw weights are then divided by their sum so the kernel sums to 1.

use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Default standard deviation.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Largest accepted kernel side, reached at sigma of roughly 170.
pub const MAX_KERNEL_SIZE: usize = 1025;

/// A square matrix of non-negative convolution weights, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Side length of the kernel.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Integer half-width, `size / 2`. Index of the centre cell on each axis.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at column `kx`, row `ky`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= size()`.
    #[must_use]
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        assert!(kx < self.size && ky < self.size, "kernel index out of range");
        self.weights[ky * self.size + kx]
    }

    /// All weights, row-major.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate kernel rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.weights.chunks_exact(self.size)
    }

    /// Sum of all weights. Equals 1 up to rounding.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Gaussian probability density at `x` with mean 0 and standard deviation `sigma`.
#[must_use]
pub fn gaussian(x: f64, sigma: f64) -> f64 {
    (-(x * x) / (2.0 * sigma * sigma)).exp() / ((2.0 * PI).sqrt() * sigma)
}

/// Check that `sigma` describes a usable kernel.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `sigma` is not finite, not strictly
/// positive, or large enough that the kernel side exceeds [`MAX_KERNEL_SIZE`].
pub fn validate_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "sigma",
            reason: format!("must be a finite number greater than 0, got {sigma}"),
        });
    }
    let size = kernel_size(sigma);
    if size > MAX_KERNEL_SIZE {
        return Err(Error::InvalidParameter {
            name: "sigma",
            reason: format!("kernel side {size} for {sigma} exceeds {MAX_KERNEL_SIZE}"),
        });
    }
    Ok(())
}

/// Kernel side length for `sigma`: `floor(6 * sigma + 1)`.
///
/// Only meaningful for positive `sigma`; see [`validate_sigma`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kernel_size(sigma: f64) -> usize {
    // float to int casts saturate, and 6 * sigma + 1 >= 1 for positive sigma
    (6.0 * sigma + 1.0) as usize
}

/// Build the normalized Gaussian kernel for `sigma`.
///
/// Raw weights drop the `1 / (sqrt(2 pi) sigma)` factor of [`gaussian`], which
/// cancels in the normalization, and scale the distance by `sigma` before
/// squaring. Both stay finite for any accepted `sigma`, however small.
///
/// The result is a pure function of `sigma`: the same input always yields a
/// bit-identical kernel. When the side length is even the window spans
/// `[-k/2, k/2 - 1]`, so the centre sits one cell right of and below the
/// geometric middle.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for any `sigma` rejected by [`validate_sigma`].
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn build_kernel(sigma: f64) -> Result<Kernel> {
    validate_sigma(sigma)?;

    let size = kernel_size(sigma);
    let half = (size / 2) as isize;
    let mut weights = Vec::with_capacity(size * size);

    let mut sum = 0.0;
    for ky in 0..size {
        let dy = ky as isize - half;
        for kx in 0..size {
            let dx = kx as isize - half;
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            let scaled = distance / sigma;
            let w = (-0.5 * scaled * scaled).exp();
            weights.push(w);
            sum += w;
        }
    }

    for w in &mut weights {
        *w /= sum;
    }

    log::debug!("built {size}x{size} gaussian kernel for sigma={sigma}");
    Ok(Kernel { size, weights })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_follows_six_sigma_rule() {
        assert_eq!(kernel_size(1.0), 7);
        assert_eq!(kernel_size(0.5), 4);
        assert_eq!(kernel_size(2.0), 13);
        assert_eq!(kernel_size(0.1), 1);
    }

    #[test]
    fn unit_sigma_kernel_is_normalized_and_symmetric() {
        let k = build_kernel(1.0).unwrap();
        assert_eq!(k.size(), 7);
        assert_eq!(k.radius(), 3);
        assert!((k.sum() - 1.0).abs() < 1e-9);

        for ky in 0..7 {
            for kx in 0..7 {
                let w = k.weight(kx, ky);
                assert!(w >= 0.0);
                assert!((w - k.weight(6 - kx, ky)).abs() < 1e-15);
                assert!((w - k.weight(kx, 6 - ky)).abs() < 1e-15);
                assert!((w - k.weight(ky, kx)).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn centre_carries_the_largest_weight() {
        let k = build_kernel(1.0).unwrap();
        let centre = k.weight(3, 3);
        assert!(k.weights().iter().all(|&w| w <= centre));
    }

    #[test]
    fn single_cell_kernel_is_one() {
        let k = build_kernel(0.1).unwrap();
        assert_eq!(k.size(), 1);
        assert!((k.weight(0, 0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn even_kernel_centre_is_offset() {
        let k = build_kernel(0.5).unwrap();
        assert_eq!(k.size(), 4);
        assert_eq!(k.radius(), 2);
        // offset zero sits at index 2, not in the geometric middle
        assert!(k.weight(2, 2) > k.weight(1, 1));
        assert!((k.weight(1, 2) - k.weight(3, 2)).abs() < 1e-15);
        assert!((k.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rows_cover_every_weight() {
        let k = build_kernel(1.0).unwrap();
        let rows: Vec<&[f64]> = k.rows().collect();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|r| r.len() == 7));
        assert!((rows[3][3] - k.weight(3, 3)).abs() < f64::EPSILON);
    }

    #[test]
    fn kernel_is_deterministic() {
        assert_eq!(build_kernel(1.7).unwrap(), build_kernel(1.7).unwrap());
    }

    #[test]
    fn rejects_non_positive_and_non_finite_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    build_kernel(sigma),
                    Err(Error::InvalidParameter { name: "sigma", .. })
                ),
                "sigma {sigma} should be rejected"
            );
        }
    }

    #[test]
    fn tiny_sigma_yields_unit_kernel() {
        for sigma in [1e-200, 1e-310, f64::MIN_POSITIVE] {
            let k = build_kernel(sigma).unwrap();
            assert_eq!(k.size(), 1);
            assert!((k.sum() - 1.0).abs() < 1e-9, "sigma {sigma} sum {}", k.sum());
        }
    }

    #[test]
    fn small_sigma_keeps_finite_weights() {
        let k = build_kernel(0.2).unwrap();
        assert_eq!(k.size(), 2);
        assert!(k.weights().iter().all(|w| w.is_finite() && *w >= 0.0));
        assert!((k.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_oversized_kernel() {
        for sigma in [1e5, 1e300, f64::MAX] {
            assert!(
                matches!(
                    build_kernel(sigma),
                    Err(Error::InvalidParameter { name: "sigma", .. })
                ),
                "sigma {sigma} should be rejected"
            );
        }
    }

    #[test]
    fn largest_accepted_kernel_is_built() {
        let k = build_kernel(170.0).unwrap();
        assert_eq!(k.size(), 1021);
        assert!(k.size() <= MAX_KERNEL_SIZE);
        assert!(validate_sigma(171.0).is_err());
    }

    #[test]
    fn gaussian_peak_value() {
        let peak = gaussian(0.0, 1.0);
        assert!((peak - 1.0 / (2.0 * PI).sqrt()).abs() < 1e-15);
        assert!(gaussian(1.0, 1.0) < peak);
    }
}
