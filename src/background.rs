//! Luminance-threshold background removal.
//!
//! Bright, near-white pixels are treated as background and replaced with a
//! fully transparent pixel. Everything else is copied through untouched,
//! including its original alpha.

use image::Rgba;

use crate::Rgba16Image;

/// Default luminance cutoff on the 8-bit scale.
pub const DEFAULT_THRESHOLD: u8 = 150;

/// The pixel written in place of background: every channel zero.
pub const TRANSPARENT: Rgba<u16> = Rgba([0, 0, 0, 0]);

/// Grayscale luminance of a 16-bit pixel, reduced to the 8-bit scale.
///
/// Computed as the unweighted integer mean of R, G and B, shifted down by
/// 8 bits. Alpha is ignored.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn luminance(pixel: &Rgba<u16>) -> u8 {
    let [r, g, b, _] = pixel.0;
    let mean = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
    // mean <= 65535, so the shifted value always fits
    (mean >> 8) as u8
}

/// Whether a pixel counts as background for the given threshold.
#[must_use]
pub fn is_background(pixel: &Rgba<u16>, threshold: u8) -> bool {
    luminance(pixel) > threshold
}

/// Make every pixel brighter than `threshold` fully transparent.
///
/// Returns a new image with the same dimensions. Pixels that are already
/// transparent are classified by their RGB values alone, so a transparent
/// pixel with dark colour channels is kept exactly as it was.
#[must_use]
pub fn remove_background(image: &Rgba16Image, threshold: u8) -> Rgba16Image {
    let (width, height) = image.dimensions();
    let mut out = Rgba16Image::new(width, height);

    let mut cleared = 0usize;
    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        if is_background(src, threshold) {
            *dst = TRANSPARENT;
            cleared += 1;
        } else {
            *dst = *src;
        }
    }

    log::debug!(
        "background removal: {cleared} of {} pixels cleared",
        u64::from(width) * u64::from(height)
    );
    out
}
