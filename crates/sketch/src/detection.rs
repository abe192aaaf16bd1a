use std::sync::Arc;

use fabricator_common::{Geometry, Point2D, Precision, ShapeKind, ShapeRecord, Source};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ContourCandidate;

/// Extent ratio of a regular hexagon with flat top and bottom
const HEXAGON_EXTENT: f64 = 0.866;
/// Extent ratio of a triangle whose base spans its bounding box
const TRIANGLE_EXTENT: f64 = 0.5;
const POLYGON_MIN_EXTENT: f64 = 0.3;

/// A candidate interpretation of one contour
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub kind: ShapeKind,
    pub geometry: Geometry,
    pub center: Point2D,
    /// Goodness of fit in `[0, 100]`
    pub confidence: f64,
    pub vertices: u32,
    /// Contour the hypothesis was derived from, with its raw measurements
    pub candidate: Arc<ContourCandidate>,
}

impl Hypothesis {
    pub fn new(
        geometry: Geometry,
        center: Point2D,
        confidence: f64,
        vertices: u32,
        candidate: Arc<ContourCandidate>,
    ) -> Self {
        Self {
            kind: geometry.kind(),
            geometry,
            center,
            confidence: confidence.clamp(0.0, 100.0),
            vertices,
            candidate,
        }
    }

    pub fn to_record(&self) -> ShapeRecord {
        ShapeRecord::new(self.geometry.clone(), self.center, self.confidence, Source::SketchInput)
            .with_vertices(self.vertices)
    }
}

/// The five shape detectors, evaluated in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Detector {
    Circle,
    Rectangle,
    Triangle,
    Hexagon,
    Polygon,
}

impl Detector {
    pub fn kind(self) -> ShapeKind {
        match self {
            Detector::Circle => ShapeKind::Circle,
            Detector::Rectangle => ShapeKind::Rectangle,
            Detector::Triangle => ShapeKind::Triangle,
            Detector::Hexagon => ShapeKind::Hexagon,
            Detector::Polygon => ShapeKind::Polygon,
        }
    }

    /// Acceptance bound for this detector at `precision`.
    ///
    /// Circle and rectangle require their ratio to exceed the bound; triangle
    /// and hexagon require the deviation from their ideal extent to stay
    /// below it. The polygon bound does not depend on precision.
    pub fn threshold(self, precision: Precision) -> f64 {
        let p = precision.as_f64();
        match self {
            Detector::Circle => 0.7 + p * 0.02,
            Detector::Rectangle => 0.6 + p * 0.03,
            Detector::Triangle => 0.3 + p * 0.04,
            Detector::Hexagon => 0.2 + p * 0.03,
            Detector::Polygon => POLYGON_MIN_EXTENT,
        }
    }

    /// Run this detector against one contour.
    ///
    /// `Ok(None)` means the contour does not look like this shape.
    pub fn detect(self, candidate: &Arc<ContourCandidate>, precision: Precision) -> Result<Option<Hypothesis>> {
        candidate.ensure_finite()?;
        let threshold = self.threshold(precision);
        let bbox = candidate.bounding_box;
        let vertices = candidate.approx_vertices();
        let ratio = candidate.extent_ratio();

        let hypothesis = match self {
            Detector::Circle => {
                let Some(circularity) = candidate.circularity() else {
                    return Ok(None);
                };
                if circularity <= threshold {
                    return Ok(None);
                }
                let circle = candidate.enclosing_circle()?;
                Hypothesis::new(
                    Geometry::circle(circle.radius),
                    circle.center,
                    (circularity * 100.0).min(100.0),
                    0,
                    Arc::clone(candidate),
                )
            }
            Detector::Rectangle => {
                if vertices != 4 || ratio <= threshold {
                    return Ok(None);
                }
                Hypothesis::new(
                    Geometry::rectangle(bbox.width, bbox.height),
                    bbox.center(),
                    (ratio * 100.0).min(100.0),
                    4,
                    Arc::clone(candidate),
                )
            }
            Detector::Triangle => {
                let deviation = (ratio - TRIANGLE_EXTENT).abs();
                if vertices != 3 || deviation >= threshold {
                    return Ok(None);
                }
                Hypothesis::new(
                    Geometry::triangle(bbox.width, bbox.height),
                    bbox.center(),
                    ((1.0 - deviation) * 100.0).min(100.0),
                    3,
                    Arc::clone(candidate),
                )
            }
            Detector::Hexagon => {
                let deviation = (ratio - HEXAGON_EXTENT).abs();
                if vertices != 6 || deviation >= threshold {
                    return Ok(None);
                }
                Hypothesis::new(
                    Geometry::hexagon(bbox.width / 2.0),
                    bbox.center(),
                    ((1.0 - deviation) * 100.0).min(100.0),
                    6,
                    Arc::clone(candidate),
                )
            }
            Detector::Polygon => {
                if vertices <= 6 || ratio <= threshold {
                    return Ok(None);
                }
                Hypothesis::new(
                    Geometry::polygon(candidate.mean_approx_edge(), bbox.width, bbox.height),
                    bbox.center(),
                    (ratio * 100.0).min(100.0),
                    vertices as u32,
                    Arc::clone(candidate),
                )
            }
        };

        Ok(Some(hypothesis))
    }
}

/// Evaluate every detector against every contour.
///
/// Hypotheses come out grouped by contour, and within a contour in detector
/// order. A failing detector is logged and contributes nothing.
pub fn generate_hypotheses(candidates: &[Arc<ContourCandidate>], precision: Precision) -> Vec<Hypothesis> {
    let mut hypotheses = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        for detector in Detector::iter() {
            match detector.detect(candidate, precision) {
                Ok(Some(hypothesis)) => {
                    debug!(
                        contour = index,
                        %detector,
                        confidence = hypothesis.confidence,
                        "hypothesis accepted"
                    );
                    hypotheses.push(hypothesis);
                }
                Ok(None) => {}
                Err(err) => warn!(contour = index, %detector, error = %err, "detector failed; skipping"),
            }
        }
    }

    hypotheses
}
