use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Point2D, Precision, ShapeKind};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Shape-specific dimensions.
///
/// Each variant carries exactly the fields the CAD emitter reads for that
/// shape. Area and perimeter are always derived from these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Circle {
        radius: f64,
        diameter: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    /// `width` is the base
    Triangle {
        width: f64,
        height: f64,
    },
    /// Regular hexagon; `width = 2s`, `height = √3·s`
    Hexagon {
        side_length: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        side_length: f64,
        width: f64,
        height: f64,
    },
}

impl Geometry {
    pub fn circle(radius: f64) -> Self {
        Self::Circle { radius, diameter: radius * 2.0 }
    }

    pub fn circle_from_diameter(diameter: f64) -> Self {
        Self::Circle { radius: diameter / 2.0, diameter }
    }

    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::Rectangle { width, height }
    }

    pub fn triangle(base: f64, height: f64) -> Self {
        Self::Triangle { width: base, height }
    }

    /// Regular hexagon from its side length; width and height are derived
    pub fn hexagon(side_length: f64) -> Self {
        Self::Hexagon {
            side_length,
            width: 2.0 * side_length,
            height: SQRT_3 * side_length,
        }
    }

    pub fn polygon(side_length: f64, width: f64, height: f64) -> Self {
        Self::Polygon { side_length, width, height }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Triangle { .. } => ShapeKind::Triangle,
            Self::Hexagon { .. } => ShapeKind::Hexagon,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Area from the geometry fields.
    ///
    /// Triangle is `0.5·base·height`; polygon is the fixed `0.8·w·h`
    /// approximation, not an exact polygon area.
    pub fn area(&self) -> f64 {
        match *self {
            Self::Circle { radius, .. } => PI * radius * radius,
            Self::Rectangle { width, height } => width * height,
            Self::Triangle { width, height } => 0.5 * width * height,
            Self::Hexagon { side_length, .. } => 3.0 * SQRT_3 / 2.0 * side_length * side_length,
            Self::Polygon { width, height, .. } => 0.8 * width * height,
        }
    }

    /// Perimeter from the geometry fields.
    ///
    /// Triangle uses `3·√(base² + height²)` regardless of its actual sides and
    /// polygon uses `8·side`; both are deliberate approximations.
    pub fn perimeter(&self) -> f64 {
        match *self {
            Self::Circle { diameter, .. } => PI * diameter,
            Self::Rectangle { width, height } => 2.0 * (width + height),
            Self::Triangle { width, height } => 3.0 * (width * width + height * height).sqrt(),
            Self::Hexagon { side_length, .. } => 6.0 * side_length,
            Self::Polygon { side_length, .. } => 8.0 * side_length,
        }
    }

    /// Number of dimension fields carried by this variant
    pub fn field_count(&self) -> usize {
        match self {
            Self::Circle { .. } | Self::Rectangle { .. } | Self::Triangle { .. } => 2,
            Self::Hexagon { .. } | Self::Polygon { .. } => 3,
        }
    }
}

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    TextInput,
    SketchInput,
}

/// Post-hoc metadata attached by the sketch pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Manufacturing {
    pub scale_factor: f64,
    /// Always true; no manufacturability analysis is performed
    pub manufacturable: bool,
    pub min_feature_size: f64,
}

impl Manufacturing {
    pub fn for_precision(precision: Precision) -> Self {
        let p = precision.as_f64();
        Self {
            scale_factor: 1.0 + (p - 5.0) * 0.1,
            manufacturable: true,
            min_feature_size: (10.0 / p).max(1.0),
        }
    }
}

/// The canonical shape description handed to the CAD emitter.
///
/// Serializes flat: the geometry variant contributes a `type` discriminator
/// plus its dimension fields next to the common header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShapeRecord {
    #[serde(flatten)]
    geometry: Geometry,
    center: Point2D,
    area: f64,
    perimeter: f64,
    confidence: f64,
    vertices: u32,
    timestamp: DateTime<Utc>,
    source: Source,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    manufacturing: Option<Manufacturing>,
}

/// Header fields counted by [`ShapeRecord::field_count`]: type, center,
/// confidence, vertices, area, perimeter
const HEADER_FIELDS: usize = 6;

impl ShapeRecord {
    /// Build a record stamped with the current time.
    ///
    /// Area and perimeter are computed from `geometry`, the vertex count
    /// defaults to the kind's nominal count and confidence is clamped to
    /// `[0, 100]`.
    pub fn new(geometry: Geometry, center: Point2D, confidence: f64, source: Source) -> Self {
        let vertices = geometry.kind().default_vertices();
        Self {
            area: geometry.area(),
            perimeter: geometry.perimeter(),
            geometry,
            center,
            confidence: clamp_confidence(confidence),
            vertices,
            timestamp: Utc::now(),
            source,
            manufacturing: None,
        }
    }

    /// Replace the vertex count (sketch hypotheses report the approximated count)
    pub fn with_vertices(mut self, vertices: u32) -> Self {
        self.vertices = vertices;
        self
    }

    /// Attach manufacturing metadata
    pub fn with_manufacturing(mut self, manufacturing: Manufacturing) -> Self {
        self.manufacturing = Some(manufacturing);
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn center(&self) -> Point2D {
        self.center
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn vertices(&self) -> u32 {
        self.vertices
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn manufacturing(&self) -> Option<&Manufacturing> {
        self.manufacturing.as_ref()
    }

    /// Number of populated shape fields (header plus geometry)
    pub fn field_count(&self) -> usize {
        Self::field_count_for(&self.geometry)
    }

    /// Field count a record built from `geometry` would have
    pub fn field_count_for(geometry: &Geometry) -> usize {
        HEADER_FIELDS + geometry.field_count()
    }

    /// Equality ignoring the timestamp
    pub fn same_shape_as(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.center == other.center
            && self.area == other.area
            && self.perimeter == other.perimeter
            && self.confidence == other.confidence
            && self.vertices == other.vertices
            && self.source == other.source
            && self.manufacturing == other.manufacturing
    }

    /// JSON schema of the serialized record
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ShapeRecord)
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_circle_measurements() {
        let geometry = Geometry::circle(25.0);
        assert!(approx_eq(geometry.area(), 1963.495_408_493_620_7));
        assert!(approx_eq(geometry.perimeter(), 157.079_632_679_489_66));
        assert_eq!(Geometry::circle_from_diameter(50.0), geometry);
    }

    #[test]
    fn test_hexagon_derives_width_and_height() {
        match Geometry::hexagon(10.0) {
            Geometry::Hexagon { side_length, width, height } => {
                assert_eq!(side_length, 10.0);
                assert_eq!(width, 20.0);
                assert!(approx_eq(height, 17.320_508_075_688_77));
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        assert!(approx_eq(Geometry::hexagon(10.0).area(), 259.807_621_135_331_6));
        assert_eq!(Geometry::hexagon(10.0).perimeter(), 60.0);
    }

    #[test]
    fn test_approximate_formulas() {
        let triangle = Geometry::triangle(3.0, 4.0);
        assert_eq!(triangle.area(), 6.0);
        assert_eq!(triangle.perimeter(), 15.0);

        let polygon = Geometry::polygon(50.0, 100.0, 100.0);
        assert_eq!(polygon.area(), 8000.0);
        assert_eq!(polygon.perimeter(), 400.0);
    }

    #[test]
    fn test_record_derives_area_and_clamps_confidence() {
        let record = ShapeRecord::new(
            Geometry::rectangle(100.0, 50.0),
            Point2D::origin(),
            140.0,
            Source::TextInput,
        );
        assert_eq!(record.area(), 5000.0);
        assert_eq!(record.perimeter(), 300.0);
        assert_eq!(record.confidence(), 100.0);
        assert_eq!(record.vertices(), 4);
        assert_eq!(record.field_count(), 8);

        let low = ShapeRecord::new(Geometry::circle(1.0), Point2D::origin(), f64::NAN, Source::SketchInput);
        assert_eq!(low.confidence(), 0.0);
        assert_eq!(low.vertices(), 0);
    }

    #[test]
    fn test_manufacturing_for_precision() {
        let low = Manufacturing::for_precision(Precision::new(1).unwrap());
        assert!(approx_eq(low.scale_factor, 0.6));
        assert_eq!(low.min_feature_size, 10.0);
        assert!(low.manufacturable);

        let high = Manufacturing::for_precision(Precision::new(10).unwrap());
        assert!(approx_eq(high.scale_factor, 1.5));
        assert_eq!(high.min_feature_size, 1.0);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ShapeRecord::new(Geometry::hexagon(5.0), Point2D::new(1.0, 2.0), 90.0, Source::SketchInput)
            .with_vertices(6)
            .with_manufacturing(Manufacturing::for_precision(Precision::default()));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "hexagon");
        assert_eq!(json["side_length"], 5.0);
        assert_eq!(json["width"], 10.0);
        assert_eq!(json["source"], "sketch_input");
        assert_eq!(json["manufacturable"], true);
        assert_eq!(json["center"]["x"], 1.0);
        assert!(json.get("radius").is_none());

        let parsed: ShapeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_text_record_omits_manufacturing() {
        let record = ShapeRecord::new(Geometry::circle(2.0), Point2D::origin(), 85.0, Source::TextInput);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("scale_factor").is_none());
        assert_eq!(json["source"], "text_input");
    }

    #[test]
    fn test_same_shape_ignores_timestamp() {
        let a = ShapeRecord::new(Geometry::circle(3.0), Point2D::origin(), 85.0, Source::TextInput);
        let b = ShapeRecord::new(Geometry::circle(3.0), Point2D::origin(), 85.0, Source::TextInput);
        assert!(a.same_shape_as(&b));

        let c = ShapeRecord::new(Geometry::circle(4.0), Point2D::origin(), 85.0, Source::TextInput);
        assert!(!a.same_shape_as(&c));
    }

    #[test]
    fn test_schema_names_type_discriminator() {
        let schema = serde_json::to_string(&ShapeRecord::schema()).unwrap();
        assert!(schema.contains("\"type\""));
        assert!(schema.contains("confidence"));
    }
}
