//! Image preprocessing for OCR.
//!
//! Scanned receipts arrive with uneven lighting and speckle. The pipeline is
//! grayscale, Gaussian adaptive threshold, median denoise and histogram
//! equalization, in that order.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::equalize_histogram;
use imageproc::filter::median_filter;
use tracing::debug;

use crate::models::config::OcrConfig;

/// Image preprocessor for the OCR pipeline.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Neighbourhood size for adaptive thresholding.
    block_size: u32,
    /// Constant subtracted from the weighted local mean.
    threshold_constant: i32,
    /// Median filter kernel size.
    median_kernel: u32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            block_size: 11,
            threshold_constant: 2,
            median_kernel: 3,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new()
            .with_block_size(config.threshold_block_size)
            .with_threshold_constant(config.threshold_constant)
            .with_median_kernel(config.median_kernel_size)
    }

    /// Set the thresholding neighbourhood. Even sizes are bumped to the next odd.
    pub fn with_block_size(mut self, size: u32) -> Self {
        self.block_size = odd_at_least(size, 3);
        self
    }

    pub fn with_threshold_constant(mut self, c: i32) -> Self {
        self.threshold_constant = c;
        self
    }

    /// Set the median kernel. Even sizes are bumped to the next odd.
    pub fn with_median_kernel(mut self, size: u32) -> Self {
        self.median_kernel = odd_at_least(size, 1);
        self
    }

    /// Produce the binarized, denoised, equalized image handed to the engine.
    pub fn prepare(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        debug!("Preparing {}x{} image for OCR", width, height);

        if width == 0 || height == 0 {
            return gray;
        }

        let binary = self.adaptive_threshold(&gray);
        let radius = self.median_kernel / 2;
        let denoised = median_filter(&binary, radius, radius);
        equalize_histogram(&denoised)
    }

    /// Gaussian-weighted adaptive threshold with replicated borders.
    ///
    /// A pixel becomes white when it is brighter than the weighted mean of its
    /// neighbourhood minus the constant, black otherwise.
    fn adaptive_threshold(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let kernel = gaussian_kernel(self.block_size);
        let half = (self.block_size / 2) as i64;

        // Separable blur: rows first, then columns.
        let mut horizontal = vec![0f32; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let mut acc = 0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = clamp(x as i64 + k as i64 - half, width);
                    acc += weight * image.get_pixel(sx, y)[0] as f32;
                }
                horizontal[(y * width + x) as usize] = acc;
            }
        }

        let mut result = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let mut mean = 0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = clamp(y as i64 + k as i64 - half, height);
                    mean += weight * horizontal[(sy * width + x) as usize];
                }

                let threshold = mean.round() as i32 - self.threshold_constant;
                let pixel_value = image.get_pixel(x, y)[0] as i32;

                let output = if pixel_value > threshold { 255 } else { 0 };
                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized 1-D Gaussian weights, with sigma derived from the size the
/// same way OpenCV does for `ksize` without an explicit sigma.
fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn clamp(pos: i64, len: u32) -> u32 {
    pos.clamp(0, len as i64 - 1) as u32
}

fn odd_at_least(size: u32, min: u32) -> u32 {
    let size = size.max(min);
    if size % 2 == 0 { size + 1 } else { size }
}
