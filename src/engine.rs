//! Pipeline driver: options, the two-stage engine, and file-level processing.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::background::{self, DEFAULT_THRESHOLD};
use crate::convolution;
use crate::error::Result;
use crate::kernel::{self, DEFAULT_SIGMA};
use crate::Rgba16Image;

/// Tunable parameters of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessOptions {
    /// Luminance cutoff on the 8-bit scale. Brighter pixels become transparent.
    pub threshold: u8,
    /// Standard deviation of the Gaussian blur. Must be finite and positive.
    pub sigma: f64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            sigma: DEFAULT_SIGMA,
        }
    }
}

impl ProcessOptions {
    /// Check the options before any pixel work is done.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidParameter`] if `sigma` is unusable.
    pub fn validate(&self) -> Result<()> {
        kernel::validate_sigma(self.sigma)
    }
}

/// Outcome of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the source file.
    pub input: PathBuf,
    /// Path the PNG was written to.
    pub output: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Wall-clock time from decoded input to written output.
    pub elapsed: Duration,
}

/// Background remover and Gaussian blur with validated parameters.
///
/// Create once with [`BackdropEngine::new()`] and reuse for multiple images.
#[derive(Debug, Clone)]
pub struct BackdropEngine {
    options: ProcessOptions,
}

impl BackdropEngine {
    /// Create an engine, rejecting invalid options up front.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidParameter`] if `sigma` is unusable.
    pub fn new(options: ProcessOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this engine runs with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// First stage: make background pixels transparent.
    #[must_use]
    pub fn remove_background(&self, image: &Rgba16Image) -> Rgba16Image {
        background::remove_background(image, self.options.threshold)
    }

    /// Second stage: Gaussian blur down to 8-bit output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidParameter`] if `sigma` is unusable,
    /// which cannot happen for an engine built through [`BackdropEngine::new()`].
    pub fn blur(&self, image: &Rgba16Image) -> Result<RgbaImage> {
        convolution::gaussian_blur(image, self.options.sigma)
    }

    /// Run both stages on a decoded image of any pixel format.
    ///
    /// # Errors
    ///
    /// See [`BackdropEngine::blur`].
    pub fn apply(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let stripped = self.remove_background(&image.to_rgba16());
        self.blur(&stripped)
    }

    /// Process a single image file: load, strip, blur, save as PNG.
    ///
    /// The output lands at [`numbered_output_path`]`(output_dir, requested_output)`,
    /// so existing files are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be decoded, or the output directory
    /// or file cannot be created or encoded.
    pub fn process_file(
        &self,
        input: &Path,
        requested_output: &Path,
        output_dir: &Path,
    ) -> Result<ProcessResult> {
        let decoded = image::open(input)?;
        let (width, height) = (decoded.width(), decoded.height());
        log::debug!("decoded {} ({width}x{height})", input.display());

        let started = Instant::now();
        let smoothed = self.apply(&decoded)?;

        let output = numbered_output_path(output_dir, requested_output);
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        save_png(&smoothed, &output)?;
        let elapsed = started.elapsed();
        log::debug!("wrote {} in {elapsed:?}", output.display());

        Ok(ProcessResult {
            input: input.to_path_buf(),
            output,
            width,
            height,
            elapsed,
        })
    }
}

/// Encode an RGBA image as PNG, whatever extension `path` carries.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Find the first free numbered variant of `requested` under `dir`.
///
/// A counter starting at 1 is inserted between the file stem and extension:
/// `out.png` becomes `dir/out1.png`, then `dir/out2.png`, and so on. Relative
/// parent components of `requested` are kept below `dir`; an absolute
/// `requested` ignores `dir`. Paths whose existence cannot be checked are
/// treated as free, so the subsequent create reports the real error.
#[must_use]
pub fn numbered_output_path(dir: &Path, requested: &Path) -> PathBuf {
    let stem = requested
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    let ext = requested.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = dir.join(requested.parent().unwrap_or(Path::new("")));

    let mut n: u64 = 1;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}{n}.{ext}"),
            None => format!("{stem}{n}"),
        };
        let candidate = parent.join(name);
        if !candidate.try_exists().unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}
