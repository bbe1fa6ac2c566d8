//! Direct 2D convolution of a 16-bit RGBA image with a [`Kernel`].
//!
//! Every output pixel is an independent weighted sum over the read-only source
//! grid, written once into a fresh output buffer. All four channels, alpha
//! included, go through the same weights.
//!
//! Border handling: taps whose source coordinate falls outside the image are
//! skipped, and the weights that did fire are not renormalized. Pixels within
//! `radius` of an edge therefore come out attenuated, darkest in the corners.

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::kernel::{build_kernel, Kernel};
use crate::Rgba16Image;

/// Scale between the 16-bit working precision and the 8-bit output.
const U16_PER_U8: f64 = 257.0;

/// Weighted sum of the source neighbourhood around `(x, y)`, per channel.
///
/// Kernel cell `(kx, ky)` reads source pixel `(x + kx - r, y + ky - r)` where
/// `r` is the kernel radius. Cells mapping outside the image contribute nothing.
/// The sums stay in 16-bit units.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn accumulate(src: &Rgba16Image, kernel: &Kernel, x: u32, y: u32) -> [f64; 4] {
    let (width, height) = (i64::from(src.width()), i64::from(src.height()));
    let radius = kernel.radius() as i64;
    let mut acc = [0.0f64; 4];

    for (ky, row) in kernel.rows().enumerate() {
        let sy = i64::from(y) + ky as i64 - radius;
        if sy < 0 || sy >= height {
            continue;
        }
        for (kx, &weight) in row.iter().enumerate() {
            let sx = i64::from(x) + kx as i64 - radius;
            if sx < 0 || sx >= width {
                continue;
            }
            let px = src.get_pixel(sx as u32, sy as u32);
            for (sum, &channel) in acc.iter_mut().zip(px.0.iter()) {
                *sum += f64::from(channel) * weight;
            }
        }
    }

    acc
}

/// Rescale accumulated 16-bit sums to an 8-bit pixel, truncating toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_output_pixel(acc: [f64; 4]) -> Rgba<u8> {
    // float to u8 casts saturate at 0 and 255
    Rgba(acc.map(|v| (v / U16_PER_U8) as u8))
}

/// Convolve every channel of `src` with `kernel`, producing an 8-bit image of
/// the same dimensions.
#[must_use]
pub fn convolve(src: &Rgba16Image, kernel: &Kernel) -> RgbaImage {
    let (width, height) = src.dimensions();
    log::debug!(
        "convolving {width}x{height} image with {0}x{0} kernel",
        kernel.size()
    );
    RgbaImage::from_fn(width, height, |x, y| {
        to_output_pixel(accumulate(src, kernel, x, y))
    })
}

/// Build the kernel for `sigma` and convolve `src` with it.
///
/// The kernel only lives for the duration of this call.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidParameter`] if `sigma` is not a valid
/// standard deviation. No pixel work is done in that case.
pub fn gaussian_blur(src: &Rgba16Image, sigma: f64) -> Result<RgbaImage> {
    let kernel = build_kernel(sigma)?;
    Ok(convolve(src, &kernel))
}
