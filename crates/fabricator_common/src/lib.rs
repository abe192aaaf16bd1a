//! # Fabricator Common - Shared Shape Types
//!
//! The record produced by both shape-inference pipelines (text and sketch) and
//! consumed by the CAD emitter, plus the small value types the pipelines share:
//! shape kinds, expected-shape hints, precision levels and 2D points.
//!
//! ## Example
//!
//! ```rust
//! use fabricator_common::{Geometry, Point2D, ShapeKind, ShapeRecord, Source};
//!
//! let record = ShapeRecord::new(Geometry::circle(25.0), Point2D::origin(), 92.0, Source::TextInput);
//! assert_eq!(record.kind(), ShapeKind::Circle);
//! assert!((record.area() - 1963.495).abs() < 1e-3);
//! ```

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub mod record;

// Re-exports for convenience
pub use chrono::{DateTime, Utc};
pub use record::{Geometry, Manufacturing, ShapeRecord, Source};

/// Result type for shared shape operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised while validating caller-supplied shape parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommonError {
    #[error("Invalid precision {0}: expected a value in {}..={}", Precision::MIN, Precision::MAX)]
    InvalidPrecision(i64),

    #[error("Precision must be an integer, got '{0}'")]
    UnparseablePrecision(String),

    #[error("Unknown shape hint '{0}': expected auto or one of circle, rectangle, triangle, hexagon, polygon")]
    UnknownShapeHint(String),
}

/// The closed set of shapes either pipeline can report.
///
/// Iteration order (`ShapeKind::iter()`) is fixed and matches the order in
/// which detectors and keyword groups are evaluated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Triangle,
    Hexagon,
    /// Catch-all for shapes with seven or more sides
    Polygon,
}

impl ShapeKind {
    /// Vertex count the CAD emitter uses to pick a generation strategy
    pub fn default_vertices(self) -> u32 {
        match self {
            Self::Circle => 0,
            Self::Rectangle => 4,
            Self::Triangle => 3,
            Self::Hexagon => 6,
            Self::Polygon => 8,
        }
    }
}

/// Caller-supplied expected shape.
///
/// `Auto` leaves classification to the pipeline; `Shape` constrains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeHint {
    #[default]
    Auto,
    Shape(ShapeKind),
}

impl ShapeHint {
    /// The hinted shape, or `None` for auto-detection
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Self::Auto => None,
            Self::Shape(kind) => Some(kind),
        }
    }
}

impl From<ShapeKind> for ShapeHint {
    fn from(kind: ShapeKind) -> Self {
        Self::Shape(kind)
    }
}

impl FromStr for ShapeHint {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "auto" | "auto-detect" | "auto_detect" => Ok(Self::Auto),
            other => ShapeKind::from_str(other)
                .map(Self::Shape)
                .map_err(|_| CommonError::UnknownShapeHint(trimmed.to_string())),
        }
    }
}

impl fmt::Display for ShapeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Shape(kind) => write!(f, "{kind}"),
        }
    }
}

/// Processing precision level, always within `1..=10`.
///
/// Higher precision means less smoothing, stricter shape acceptance and a
/// larger minimum feature size in the sketch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision(u8);

impl Precision {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Precision = Precision(7);

    /// Validate a precision level
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CommonError::InvalidPrecision(value as i64))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Every valid precision level, ascending
    pub fn all() -> impl Iterator<Item = Precision> {
        (Self::MIN..=Self::MAX).map(Precision)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Precision {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

impl FromStr for Precision {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| CommonError::UnparseablePrecision(s.to_string()))?;
        u8::try_from(value)
            .map_err(|_| CommonError::InvalidPrecision(value))
            .and_then(Self::new)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl JsonSchema for Precision {
    fn schema_name() -> String {
        "Precision".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        let mut schema = <u8 as JsonSchema>::json_schema(generator).into_object();
        schema.number().minimum = Some(f64::from(Self::MIN));
        schema.number().maximum = Some(f64::from(Self::MAX));
        schema.into()
    }
}

/// 2D point with floating-point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Calculate distance to another point
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}
