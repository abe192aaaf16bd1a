//! # Shape Descriptions
//!
//! Turns short natural-language descriptions ("a circle with radius 25mm",
//! "Rectangle 100mm by 50mm") into a [`ShapeRecord`].
//!
//! The pipeline is pattern based: text is normalized, classified against
//! keyword groups, scanned for labeled and unlabeled measurements, and the
//! result is filled out with per-shape defaults. It never rejects input.
//!
//! ```rust
//! use description::describe;
//! use fabricator_common::{ShapeHint, ShapeKind};
//!
//! let record = describe("Rectangle 100mm by 50mm", ShapeHint::Auto);
//! assert_eq!(record.kind(), ShapeKind::Rectangle);
//! assert_eq!(record.area(), 5000.0);
//! ```

pub mod builder;
pub mod classifier;
pub mod dimensions;
pub mod units;
pub mod vocabulary;

pub use builder::{geometry_for, TextShapeBuilder};
pub use classifier::ShapeTypeClassifier;
pub use dimensions::{DimensionExtractor, DimensionKind, Dimensions};
pub use units::{to_millimeters, LengthUnit};
pub use vocabulary::TextVocabulary;

use fabricator_common::{ShapeHint, ShapeRecord};

/// Build a shape record from a description using the shared vocabulary
pub fn describe(text: &str, hint: ShapeHint) -> ShapeRecord {
    TextShapeBuilder::new().build(text, hint)
}
