//! Synthetic outline sketches for demos and pipeline tests.
//!
//! Each sample is a black 5 px outline on a white canvas. Outlines are drawn
//! as a filled dark shape with a filled white shape inset by the stroke width.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use fabricator_common::ShapeKind;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::error::{Result, SketchError};

/// Thick enough to survive the 3×3 opening at every precision
const STROKE: f64 = 5.0;
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone)]
pub struct SampleSketch {
    pub name: &'static str,
    /// Shape the sample depicts
    pub kind: ShapeKind,
    pub image: RgbImage,
}

impl SampleSketch {
    pub fn file_name(&self) -> String {
        format!("sample_{}.png", self.name)
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.image.clone())
    }

    /// PNG-encoded image bytes
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|err| SketchError::Processing(format!("failed to encode {}: {err}", self.name)))?;
        Ok(bytes.into_inner())
    }

    /// Write the sample as a PNG into an existing directory
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|err| SketchError::Processing(format!("failed to write {}: {err}", path.display())))?;
        Ok(path)
    }
}

/// Every sample, one per supported shape kind
pub fn sample_sketches() -> Vec<SampleSketch> {
    vec![
        SampleSketch { name: "circle", kind: ShapeKind::Circle, image: sample_circle() },
        SampleSketch { name: "rectangle", kind: ShapeKind::Rectangle, image: sample_rectangle() },
        SampleSketch { name: "triangle", kind: ShapeKind::Triangle, image: sample_triangle() },
        SampleSketch { name: "hexagon", kind: ShapeKind::Hexagon, image: sample_hexagon() },
        SampleSketch { name: "octagon", kind: ShapeKind::Polygon, image: sample_octagon() },
    ]
}

/// Circle of radius 80 centred on a 400×400 canvas
pub fn sample_circle() -> RgbImage {
    let mut image = RgbImage::from_pixel(400, 400, PAPER);
    draw_filled_circle_mut(&mut image, (200, 200), 80, INK);
    draw_filled_circle_mut(&mut image, (200, 200), 80 - STROKE as i32, PAPER);
    image
}

/// 300×200 rectangle on a 400×300 canvas
pub fn sample_rectangle() -> RgbImage {
    let mut image = RgbImage::from_pixel(400, 300, PAPER);
    let stroke = STROKE as u32;
    draw_filled_rect_mut(&mut image, Rect::at(50, 50).of_size(301, 201), INK);
    draw_filled_rect_mut(
        &mut image,
        Rect::at(50 + stroke as i32, 50 + stroke as i32).of_size(301 - 2 * stroke, 201 - 2 * stroke),
        PAPER,
    );
    image
}

/// Isosceles triangle with its base along the bottom, on a 400×300 canvas
pub fn sample_triangle() -> RgbImage {
    let mut image = RgbImage::from_pixel(400, 300, PAPER);
    let vertices = [[200.0, 50.0], [100.0, 250.0], [300.0, 250.0]];
    let (incenter, inradius) = incircle(vertices);
    draw_outline(&mut image, &vertices, incenter, inradius);
    image
}

/// Regular hexagon with circumradius 80 and flat top and bottom
pub fn sample_hexagon() -> RgbImage {
    let mut image = RgbImage::from_pixel(400, 400, PAPER);
    draw_regular_outline(&mut image, 6, 80.0, 0.0);
    image
}

/// Regular octagon with circumradius 80 and axis-aligned sides
pub fn sample_octagon() -> RgbImage {
    let mut image = RgbImage::from_pixel(400, 400, PAPER);
    draw_regular_outline(&mut image, 8, 80.0, std::f64::consts::PI / 8.0);
    image
}

fn draw_regular_outline(image: &mut RgbImage, sides: usize, radius: f64, rotation: f64) {
    let center = [f64::from(image.width()) / 2.0, f64::from(image.height()) / 2.0];
    let vertices: Vec<[f64; 2]> = (0..sides)
        .map(|i| {
            let angle = rotation + std::f64::consts::TAU * i as f64 / sides as f64;
            [center[0] + radius * angle.cos(), center[1] + radius * angle.sin()]
        })
        .collect();
    let inradius = radius * (std::f64::consts::PI / sides as f64).cos();
    draw_outline(image, &vertices, center, inradius);
}

/// Fill the polygon with ink, then fill it again with paper shrunk towards
/// `center` so that every side moves inward by the stroke width
fn draw_outline(image: &mut RgbImage, vertices: &[[f64; 2]], center: [f64; 2], inradius: f64) {
    let scale = 1.0 - STROKE / inradius;
    let inner: Vec<[f64; 2]> = vertices
        .iter()
        .map(|&[x, y]| [center[0] + (x - center[0]) * scale, center[1] + (y - center[1]) * scale])
        .collect();

    draw_polygon_mut(image, &to_points(vertices), INK);
    draw_polygon_mut(image, &to_points(&inner), PAPER);
}

fn to_points(vertices: &[[f64; 2]]) -> Vec<Point<i32>> {
    vertices
        .iter()
        .map(|&[x, y]| Point::new(x.round() as i32, y.round() as i32))
        .collect()
}

/// Incenter and inradius of a triangle
fn incircle([a, b, c]: [[f64; 2]; 3]) -> ([f64; 2], f64) {
    let len = |p: [f64; 2], q: [f64; 2]| ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2)).sqrt();
    let (ea, eb, ec) = (len(b, c), len(c, a), len(a, b));
    let perimeter = ea + eb + ec;

    let center = [
        (ea * a[0] + eb * b[0] + ec * c[0]) / perimeter,
        (ea * a[1] + eb * b[1] + ec * c[1]) / perimeter,
    ];
    let area = ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0;
    (center, 2.0 * area / perimeter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_ink(image: &RgbImage, x: u32, y: u32) -> bool {
        image.get_pixel(x, y)[0] < 128
    }

    #[test]
    fn test_one_sample_per_kind() {
        let samples = sample_sketches();
        let kinds: Vec<ShapeKind> = samples.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShapeKind::Circle,
                ShapeKind::Rectangle,
                ShapeKind::Triangle,
                ShapeKind::Hexagon,
                ShapeKind::Polygon
            ]
        );
        assert_eq!(samples[0].file_name(), "sample_circle.png");
    }

    #[test]
    fn test_outlines_are_hollow() {
        let circle = sample_circle();
        assert!(is_ink(&circle, 279, 200));
        assert!(is_ink(&circle, 276, 200));
        assert!(!is_ink(&circle, 274, 200));
        assert!(!is_ink(&circle, 200, 200));
        assert!(!is_ink(&circle, 10, 10));

        let rectangle = sample_rectangle();
        assert!(is_ink(&rectangle, 50, 150));
        assert!(is_ink(&rectangle, 54, 150));
        assert!(!is_ink(&rectangle, 55, 150));
        assert!(!is_ink(&rectangle, 200, 150));
    }

    #[test]
    fn test_incircle_of_sample_triangle() {
        let (center, radius) = incircle([[200.0, 50.0], [100.0, 250.0], [300.0, 250.0]]);
        assert!((center[0] - 200.0).abs() < 1e-9);
        assert!((center[1] - 188.196).abs() < 1e-3);
        assert!((radius - 61.803).abs() < 1e-3);
    }

    #[test]
    fn test_png_bytes_decode() {
        let sample = &sample_sketches()[1];
        let bytes = sample.to_png_bytes().expect("Should encode");
        let decoded = image::load_from_memory(&bytes).expect("Should decode");
        assert_eq!((decoded.width(), decoded.height()), (400, 300));
    }
}
