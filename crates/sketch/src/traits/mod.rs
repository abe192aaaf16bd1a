use image::GrayImage;
use crate::{error::Result, types::Contour};

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image (e.g., blur, threshold)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract closed contours from a binary foreground mask
    fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Contour>>;
}
