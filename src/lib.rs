//! Strip near-white photo backgrounds to transparency and soften the result.
//!
//! The pipeline has two pure stages applied in order:
//!
//! 1. **Background removal**: every pixel whose RGB luminance exceeds a
//!    threshold (150 on the 8-bit scale by default) becomes fully transparent.
//! 2. **Gaussian blur**: a normalized 2D Gaussian kernel with side
//!    `floor(6 * sigma + 1)` is convolved over all four channels. Taps falling
//!    outside the image are dropped without renormalizing, so borders fade.
//!
//! Images are processed at 16 bits per channel and emitted at 8 bits.
//!
//! # Quick Start
//!
//! ```no_run
//! use backdrop_blur::{BackdropEngine, ProcessOptions};
//!
//! let engine = BackdropEngine::new(ProcessOptions::default()).expect("valid options");
//! let img = image::open("photo.jpg").unwrap();
//! let smoothed = engine.apply(&img).unwrap();
//! smoothed.save("photo_cutout.png").unwrap();
//! ```
//!
//! # Individual stages
//!
//! ```
//! use backdrop_blur::{background, convolution, Rgba16Image};
//!
//! let img = Rgba16Image::from_pixel(3, 3, image::Rgba([65535; 4]));
//! let stripped = background::remove_background(&img, 150);
//! let blurred = convolution::gaussian_blur(&stripped, 1.0).unwrap();
//! assert!(blurred.pixels().all(|p| p.0 == [0, 0, 0, 0]));
//! ```

#![deny(missing_docs)]

use image::{ImageBuffer, Rgba};

pub mod background;
pub mod convolution;
mod engine;
pub mod error;
pub mod kernel;

pub use engine::{numbered_output_path, save_png, BackdropEngine, ProcessOptions, ProcessResult};
pub use error::{Error, Result};

/// An RGBA image with 16 bits per channel, the working precision of the pipeline.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;
