//! # Sketch Shape Recognition Library
//!
//! Turns a raster sketch of a single outline into a [`ShapeRecord`].
//!
//! ## Pipeline
//!
//! 1. **Preprocessing**: grayscale, precision-scaled Gaussian blur, adaptive
//!    inverted threshold, morphological close and open
//! 2. **Contours**: external outer borders above a precision-scaled area
//!    floor, each approximated with Douglas-Peucker
//! 3. **Hypotheses**: every [`Detector`] is tried on every contour
//! 4. **Selection**: the hinted or most confident hypothesis wins, with a
//!    fallback circle when nothing matched
//! 5. **Enrichment**: manufacturing metadata for the precision level
//!
//! Coordinates and dimensions stay in pixels.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fabricator_common::{Precision, ShapeHint};
//! use sketch::SketchPipeline;
//!
//! let pipeline = SketchPipeline::new(Precision::default(), ShapeHint::Auto);
//! let bytes = std::fs::read("sketch.png")?;
//! let record = pipeline.process_bytes(&bytes)?;
//! println!("{} ({:.1}%)", record.kind(), record.confidence());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust
//! use fabricator_common::Precision;
//! use sketch::{algorithms::*, SketchPipeline};
//!
//! // Already clean, dark-on-light drawings need no blur
//! let pipeline = SketchPipeline::builder(Precision::default())
//!     .add_preprocessor(ThresholdPreprocessor { threshold: 128 })
//!     .set_contour_extractor(ExternalContourExtractor)
//!     .build();
//! ```

// Core modules
pub mod algorithms;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod samples;
pub mod selection;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use detection::{generate_hypotheses, Detector, Hypothesis};
pub use error::{Result, SketchError};
pub use pipeline::{SketchPipeline, SketchPipelineBuilder};
pub use selection::{fallback_record, select_best, select_record};
pub use traits::*;
pub use types::{BoundingBox, Contour, ContourCandidate, EnclosingCircle};

use fabricator_common::{Precision, ShapeHint, ShapeRecord};

/// Decode and process one sketch with the standard pipeline.
///
/// `precision` must lie in `1..=10`.
pub fn process_sketch(bytes: &[u8], hint: ShapeHint, precision: u8) -> Result<ShapeRecord> {
    let precision = Precision::new(precision)?;
    SketchPipeline::new(precision, hint).process_bytes(bytes)
}
