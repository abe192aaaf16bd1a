use fabricator_common::{Geometry, Point2D, ShapeHint, ShapeKind, ShapeRecord, Source};
use tracing::{debug, info};

use crate::classifier::ShapeTypeClassifier;
use crate::dimensions::{DimensionExtractor, DimensionKind, Dimensions};
use crate::vocabulary::TextVocabulary;

pub const BASE_CONFIDENCE: f64 = 85.0;
pub const CONFIDENCE_BOOST: f64 = 5.0;

const DEFAULT_RADIUS: f64 = 25.0;
const DEFAULT_WIDTH: f64 = 100.0;
const DEFAULT_HEIGHT: f64 = 75.0;
const DEFAULT_SIDE: f64 = 50.0;
const DEFAULT_POLYGON_EXTENT: f64 = 100.0;

/// Turns a free-form description into a [`ShapeRecord`].
///
/// Never fails: unrecognized text degrades to a 25 mm circle.
#[derive(Debug, Clone, Copy)]
pub struct TextShapeBuilder<'v> {
    vocabulary: &'v TextVocabulary,
}

impl TextShapeBuilder<'static> {
    /// Builder over the process-wide vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(TextVocabulary::shared())
    }
}

impl Default for TextShapeBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'v> TextShapeBuilder<'v> {
    pub fn with_vocabulary(vocabulary: &'v TextVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn build(&self, text: &str, hint: ShapeHint) -> ShapeRecord {
        let normalized = self.vocabulary.normalize(text);
        let kind = ShapeTypeClassifier::new(self.vocabulary).classify(&normalized, hint);
        let dimensions = DimensionExtractor::new(self.vocabulary).extract(&normalized);

        let geometry = geometry_for(kind, &dimensions);
        let confidence = self.confidence(&geometry, &normalized);
        debug!(%normalized, ?geometry, confidence, "built shape from description");

        let record = ShapeRecord::new(geometry, Point2D::origin(), confidence, Source::TextInput);
        info!(kind = %record.kind(), confidence = record.confidence(), "text shape ready");
        record
    }

    /// Base 85 plus 5 for each of: more than five populated fields, a unit
    /// token in the text, an explicit shape name in the text
    fn confidence(&self, geometry: &Geometry, normalized: &str) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if ShapeRecord::field_count_for(geometry) > 5 {
            confidence += CONFIDENCE_BOOST;
        }
        if self.vocabulary.mentions_unit(normalized) {
            confidence += CONFIDENCE_BOOST;
        }
        if self.vocabulary.names_shape(normalized) {
            confidence += CONFIDENCE_BOOST;
        }
        confidence.min(100.0)
    }
}

/// Geometry for `kind`, falling back to per-kind defaults for missing values
pub fn geometry_for(kind: ShapeKind, dimensions: &Dimensions) -> Geometry {
    use DimensionKind::*;

    match kind {
        ShapeKind::Circle => match (dimensions.get(Diameter), dimensions.get(Radius)) {
            (Some(diameter), _) => Geometry::circle_from_diameter(diameter),
            (None, Some(radius)) => Geometry::circle(radius),
            (None, None) => Geometry::circle(DEFAULT_RADIUS),
        },
        ShapeKind::Rectangle => {
            // One given side makes a square
            let (width, height) = match (dimensions.get(Width), dimensions.get(Height)) {
                (Some(width), Some(height)) => (width, height),
                (Some(width), None) => (width, width),
                (None, Some(height)) => (height, height),
                (None, None) => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            };
            Geometry::rectangle(width, height)
        }
        ShapeKind::Triangle => {
            let base = dimensions
                .get(Width)
                .or_else(|| dimensions.get(Length))
                .unwrap_or(DEFAULT_WIDTH);
            Geometry::triangle(base, dimensions.get(Height).unwrap_or(DEFAULT_HEIGHT))
        }
        ShapeKind::Hexagon => Geometry::hexagon(dimensions.get(Side).unwrap_or(DEFAULT_SIDE)),
        ShapeKind::Polygon => Geometry::polygon(
            dimensions.get(Side).unwrap_or(DEFAULT_SIDE),
            dimensions.get(Width).unwrap_or(DEFAULT_POLYGON_EXTENT),
            dimensions.get(Height).unwrap_or(DEFAULT_POLYGON_EXTENT),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str) -> ShapeRecord {
        TextShapeBuilder::new().build(text, ShapeHint::Auto)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn assert_measurements_consistent(record: &ShapeRecord) {
        let geometry = record.geometry();
        assert!(approx_eq(record.area(), geometry.area()), "area of {record:?}");
        assert!(approx_eq(record.perimeter(), geometry.perimeter()), "perimeter of {record:?}");
        assert!((0.0..=100.0).contains(&record.confidence()));
        assert!(record.area() >= 0.0 && record.perimeter() >= 0.0);
    }

    #[test]
    fn test_circle_with_radius() {
        let record = build("A circle with radius 25mm");
        assert_eq!(record.kind(), ShapeKind::Circle);
        assert_eq!(record.geometry(), &Geometry::Circle { radius: 25.0, diameter: 50.0 });
        assert!((record.area() - 1963.5).abs() < 0.01);
        assert!(record.confidence() >= 85.0);
        assert_eq!(record.confidence(), 100.0);
        assert_eq!(record.center(), Point2D::origin());
        assert_eq!(record.source(), Source::TextInput);
        assert_eq!(record.vertices(), 0);
    }

    #[test]
    fn test_rectangle_by_pattern() {
        let record = build("Rectangle 100mm by 50mm");
        assert_eq!(record.kind(), ShapeKind::Rectangle);
        assert_eq!(record.geometry(), &Geometry::Rectangle { width: 100.0, height: 50.0 });
        assert_eq!(record.area(), 5000.0);
        assert_eq!(record.perimeter(), 300.0);
        assert_eq!(record.vertices(), 4);
    }

    #[test]
    fn test_unrecognized_text_falls_back_to_default_circle() {
        let record = build("hello world");
        assert_eq!(record.kind(), ShapeKind::Circle);
        assert_eq!(record.geometry(), &Geometry::circle(25.0));
        // only the field-count boost applies
        assert_eq!(record.confidence(), 90.0);
    }

    #[test]
    fn test_diameter_overrides_radius() {
        let record = build("circle r=5 d=4cm");
        assert_eq!(record.geometry(), &Geometry::Circle { radius: 20.0, diameter: 40.0 });
    }

    #[test]
    fn test_single_rectangle_side_makes_square() {
        let record = build("rectangle width=30");
        assert_eq!(record.geometry(), &Geometry::rectangle(30.0, 30.0));

        let record = build("box h: 12");
        assert_eq!(record.geometry(), &Geometry::rectangle(12.0, 12.0));

        let record = build("plain rectangle");
        assert_eq!(record.geometry(), &Geometry::rectangle(100.0, 75.0));
    }

    #[test]
    fn test_triangle_base_and_height() {
        let record = build("Triangle with base 60mm and height 40mm");
        assert_eq!(record.kind(), ShapeKind::Triangle);
        assert_eq!(record.geometry(), &Geometry::triangle(60.0, 40.0));
        assert_eq!(record.area(), 1200.0);

        let record = build("triangle length=9");
        assert_eq!(record.geometry(), &Geometry::triangle(9.0, 75.0));
    }

    #[test]
    fn test_hexagon_side_length() {
        let record = build("Hexagon with side length 30mm");
        assert_eq!(record.kind(), ShapeKind::Hexagon);
        assert_eq!(record.geometry(), &Geometry::hexagon(30.0));
        assert_eq!(record.perimeter(), 180.0);
        assert_eq!(record.vertices(), 6);

        assert_eq!(build("hex").geometry(), &Geometry::hexagon(50.0));
    }

    #[test]
    fn test_polygon_defaults_and_approximations() {
        let record = build("an odd polygon");
        assert_eq!(record.geometry(), &Geometry::polygon(50.0, 100.0, 100.0));
        assert_eq!(record.area(), 8000.0);
        assert_eq!(record.perimeter(), 400.0);
        assert_eq!(record.vertices(), 8);
    }

    #[test]
    fn test_hint_overrides_text() {
        let record = TextShapeBuilder::new().build("circle r=5", ShapeHint::Shape(ShapeKind::Rectangle));
        assert_eq!(record.kind(), ShapeKind::Rectangle);
        assert_eq!(record.geometry(), &Geometry::rectangle(100.0, 75.0));
    }

    #[test]
    fn test_confidence_boosts() {
        // field count + unit + explicit shape
        assert_eq!(build("triangle width=3cm").confidence(), 100.0);
        // field count + unit
        assert_eq!(build("hex side=3cm").confidence(), 95.0);
        // field count + explicit shape
        assert_eq!(build("hexagon").confidence(), 95.0);
    }

    #[test]
    fn test_idempotent() {
        let builder = TextShapeBuilder::new();
        for text in ["A circle with radius 25mm", "box 2 x 3 cm", "hello world"] {
            let first = builder.build(text, ShapeHint::Auto);
            let second = builder.build(text, ShapeHint::Auto);
            assert!(first.same_shape_as(&second), "{text}");
        }
    }

    #[test]
    fn test_measurements_round_trip() {
        let texts = [
            "A circle with radius 25mm",
            "Rectangle 100mm by 50mm",
            "Triangle with base 60mm and height 40mm",
            "Hexagon with side length 30mm",
            "polygon side=12 width=40 height=30",
            "a disk 3 x 4 in",
            "hello world",
        ];
        for text in texts {
            assert_measurements_consistent(&build(text));
        }
    }
}
