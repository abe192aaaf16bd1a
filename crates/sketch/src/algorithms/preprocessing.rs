use fabricator_common::Precision;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use tracing::debug;

use crate::{error::Result, traits::ImagePreprocessor};

/// Largest blur kernel, used at the lowest precision
const MAX_BLUR_KERNEL: u32 = 11;

/// Odd blur kernel size for a precision level: `max(1, 11 - p)` rounded up
/// to the next odd number
pub fn blur_kernel_size(precision: Precision) -> u32 {
    let size = MAX_BLUR_KERNEL.saturating_sub(u32::from(precision.get())).max(1);
    if size % 2 == 0 { size + 1 } else { size }
}

/// Normalized 1D Gaussian kernel with exactly `size` taps.
///
/// Sigma follows the usual derivation from the kernel size,
/// `0.3·((size − 1)·0.5 − 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = size.max(1);
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size as f64 - 1.0) / 2.0;

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let offset = i as f64 - center;
            (-(offset * offset) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    weights.into_iter().map(|w| (w / total) as f32).collect()
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    /// Odd kernel width; 1 disables blurring
    pub kernel_size: u32,
}

impl GaussianBlurPreprocessor {
    pub fn for_precision(precision: Precision) -> Self {
        Self { kernel_size: blur_kernel_size(precision) }
    }
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self::for_precision(Precision::default())
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.kernel_size <= 1 {
            return Ok(image.clone());
        }
        debug!(kernel_size = self.kernel_size, "gaussian blur");
        let kernel = gaussian_kernel(self.kernel_size);
        Ok(imageproc::filter::separable_filter_equal(image, &kernel))
    }
}

/// Adaptive Gaussian threshold producing an inverted binary mask.
///
/// A pixel becomes foreground (255) when it is darker than its
/// Gaussian-weighted neighbourhood mean by at least `c`.
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdPreprocessor {
    pub block_size: u32,
    pub c: f64,
}

impl Default for AdaptiveThresholdPreprocessor {
    fn default() -> Self {
        Self {
            block_size: 11,
            c: 2.0,
        }
    }
}

impl ImagePreprocessor for AdaptiveThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let kernel = gaussian_kernel(self.block_size);
        let local_mean = imageproc::filter::separable_filter_equal(image, &kernel);

        Ok(GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let value = f64::from(image.get_pixel(x, y)[0]);
            let threshold = f64::from(local_mean.get_pixel(x, y)[0]) - self.c;
            if value > threshold { image::Luma([0]) } else { image::Luma([255]) }
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyOperation {
    /// Dilate then erode; fills pinholes
    Close,
    /// Erode then dilate; removes specks
    Open,
}

/// Morphological close or open with a square structuring element of
/// side `2·radius + 1`
#[derive(Debug, Clone)]
pub struct MorphologyPreprocessor {
    pub operation: MorphologyOperation,
    pub radius: u8,
}

impl MorphologyPreprocessor {
    pub fn close() -> Self {
        Self { operation: MorphologyOperation::Close, radius: 1 }
    }

    pub fn open() -> Self {
        Self { operation: MorphologyOperation::Open, radius: 1 }
    }
}

impl ImagePreprocessor for MorphologyPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let processed = match self.operation {
            MorphologyOperation::Close => imageproc::morphology::close(image, Norm::LInf, self.radius),
            MorphologyOperation::Open => imageproc::morphology::open(image, Norm::LInf, self.radius),
        };
        Ok(processed)
    }
}

/// Simple thresholding preprocessor for already clean, dark-on-light input
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let mut binary = imageproc::contrast::threshold(
            image,
            self.threshold,
            imageproc::contrast::ThresholdType::Binary,
        );
        image::imageops::invert(&mut binary);
        Ok(binary)
    }
}
