use fabricator_common::Precision;
use image::GrayImage;
use imageproc::contours::BorderType;
use tracing::debug;

use crate::{error::Result, traits::ContourExtractor, types::Contour};

/// Noise floor per precision level, in square pixels
const AREA_PER_PRECISION: f64 = 100.0;

/// Contours must enclose strictly more than this many square pixels
pub fn min_contour_area(precision: Precision) -> f64 {
    AREA_PER_PRECISION * precision.as_f64()
}

/// Imageproc-based extractor returning only top-level outer borders
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_contours(&self, binary_image: &GrayImage) -> Result<Vec<Contour>> {
        let contours = imageproc::contours::find_contours::<i32>(binary_image);
        let total = contours.len();

        let external: Vec<Contour> = contours
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                Contour::new(
                    contour
                        .points
                        .iter()
                        .map(|p| [f64::from(p.x), f64::from(p.y)])
                        .collect(),
                )
            })
            .collect();

        debug!(total, external = external.len(), "extracted contours");
        Ok(external)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled_rect(image: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn test_min_contour_area_scales_with_precision() {
        assert_eq!(min_contour_area(Precision::new(1).unwrap()), 100.0);
        assert_eq!(min_contour_area(Precision::default()), 700.0);
        assert_eq!(min_contour_area(Precision::new(10).unwrap()), 1000.0);
    }

    #[test]
    fn test_nested_borders_are_skipped() {
        // Ring with a blob inside its hole
        let mut image = GrayImage::new(60, 60);
        filled_rect(&mut image, 5, 5, 55, 55, 255);
        filled_rect(&mut image, 15, 15, 45, 45, 0);
        filled_rect(&mut image, 25, 25, 35, 35, 255);

        let contours = ExternalContourExtractor.extract_contours(&image).expect("Should extract");
        assert_eq!(contours.len(), 1);

        let bbox = contours[0].bounding_box();
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (5.0, 5.0, 50.0, 50.0));
    }

    #[test]
    fn test_separate_blobs() {
        let mut image = GrayImage::new(60, 30);
        filled_rect(&mut image, 2, 2, 20, 20, 255);
        filled_rect(&mut image, 30, 5, 50, 25, 255);

        let contours = ExternalContourExtractor.extract_contours(&image).expect("Should extract");
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_empty_mask() {
        let image = GrayImage::new(16, 16);
        let contours = ExternalContourExtractor.extract_contours(&image).expect("Should extract");
        assert!(contours.is_empty());
    }
}
