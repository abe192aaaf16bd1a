use fabricator_common::Point2D;
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::algorithms::{approximate_polygon, min_enclosing_circle};
use crate::error::{Result, SketchError};

/// A closed outer boundary traced from a foreground mask, in pixel coordinates.
///
/// The ring is implicitly closed: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[f64; 2]>,
}

impl Contour {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert to a geo-types Polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.to_line_string(), vec![])
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.points.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    /// Enclosed area (shoelace)
    pub fn area(&self) -> f64 {
        use geo::Area;
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_geo_polygon().unsigned_area()
    }

    /// Length of the closed ring, including the closing segment
    pub fn perimeter(&self) -> f64 {
        closed_length(&self.points)
    }

    /// Pixel-inclusive bounding box of the ring
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for &[x, y] in &self.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if self.points.is_empty() {
            return BoundingBox::default();
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1.0,
            height: max_y - min_y + 1.0,
        }
    }
}

/// Sum of segment lengths around a closed ring
pub(crate) fn closed_length(points: &[[f64; 2]]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let segment = |a: [f64; 2], b: [f64; 2]| ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();

    let open: f64 = points.windows(2).map(|w| segment(w[0], w[1])).sum();
    open + segment(points[points.len() - 1], points[0])
}

/// Axis-aligned box, `width`/`height` counted in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnclosingCircle {
    pub center: Point2D,
    pub radius: f64,
}

/// A contour that survived the area filter, with the measurements every
/// detector needs computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourCandidate {
    pub contour: Contour,
    /// Douglas-Peucker approximation; its length drives detector dispatch
    pub approx: Vec<[f64; 2]>,
    pub area: f64,
    pub perimeter: f64,
    pub bounding_box: BoundingBox,
}

/// Fraction of the perimeter used as the approximation tolerance
pub const APPROX_TOLERANCE_RATIO: f64 = 0.02;

impl ContourCandidate {
    pub fn new(contour: Contour) -> Self {
        let area = contour.area();
        let perimeter = contour.perimeter();
        let approx = approximate_polygon(&contour.points, APPROX_TOLERANCE_RATIO * perimeter);
        let bounding_box = contour.bounding_box();
        Self {
            contour,
            approx,
            area,
            perimeter,
            bounding_box,
        }
    }

    pub fn approx_vertices(&self) -> usize {
        self.approx.len()
    }

    /// Contour area over bounding box area; 0 for a degenerate box
    pub fn extent_ratio(&self) -> f64 {
        let box_area = self.bounding_box.area();
        if box_area > 0.0 { self.area / box_area } else { 0.0 }
    }

    /// `4π·area / perimeter²`; `None` when the perimeter is zero
    pub fn circularity(&self) -> Option<f64> {
        (self.perimeter > 0.0).then(|| 4.0 * std::f64::consts::PI * self.area / self.perimeter.powi(2))
    }

    /// Mean edge length of the approximated polygon
    pub fn mean_approx_edge(&self) -> f64 {
        if self.approx.is_empty() {
            return 0.0;
        }
        closed_length(&self.approx) / self.approx.len() as f64
    }

    pub fn enclosing_circle(&self) -> Result<EnclosingCircle> {
        min_enclosing_circle(&self.contour.points)
            .ok_or_else(|| SketchError::Geometry("cannot fit a circle to an empty contour".to_string()))
    }

    /// Reject measurements a detector cannot reason about
    pub fn ensure_finite(&self) -> Result<()> {
        let values = [
            self.area,
            self.perimeter,
            self.bounding_box.width,
            self.bounding_box.height,
        ];
        if values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(SketchError::Geometry(format!(
                "non-finite contour measurements: area {}, perimeter {}",
                self.area, self.perimeter
            )))
        }
    }
}
