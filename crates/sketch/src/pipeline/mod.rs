pub mod builder;

use std::sync::Arc;

use fabricator_common::{Manufacturing, Precision, ShapeHint, ShapeRecord};
use image::{DynamicImage, GrayImage};
use tracing::{debug, info};

use crate::{
    algorithms::min_contour_area,
    detection::{generate_hypotheses, Hypothesis},
    error::Result,
    selection::select_record,
    traits::{ContourExtractor, ImagePreprocessor},
    types::ContourCandidate,
};

pub use builder::SketchPipelineBuilder;

/// Sketch-to-shape pipeline: preprocess, trace contours, hypothesize,
/// select and enrich.
///
/// Holds no per-call state, so one instance can serve many threads.
pub struct SketchPipeline {
    precision: Precision,
    hint: ShapeHint,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
}

impl SketchPipeline {
    /// Standard pipeline for a precision level and shape hint
    pub fn new(precision: Precision, hint: ShapeHint) -> Self {
        Self::builder(precision).hint(hint).with_standard_preprocessing().build()
    }

    /// Create a new pipeline builder
    pub fn builder(precision: Precision) -> SketchPipelineBuilder {
        SketchPipelineBuilder::new(precision)
    }

    pub(crate) fn from_parts(
        precision: Precision,
        hint: ShapeHint,
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
    ) -> Self {
        Self {
            precision,
            hint,
            preprocessors,
            contour_extractor,
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn hint(&self) -> ShapeHint {
        self.hint
    }

    /// Decode raw image bytes and process them. Decode failures are terminal.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ShapeRecord> {
        let image = image::load_from_memory(bytes)?;
        debug!(width = image.width(), height = image.height(), "decoded sketch");
        self.process_image(&image)
    }

    /// Process a decoded raster of any color type
    pub fn process_image(&self, image: &DynamicImage) -> Result<ShapeRecord> {
        let mask = self.preprocess(&image.to_luma8())?;
        self.process_mask(&mask)
    }

    /// Run every preprocessor in order, producing the foreground mask
    pub fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let mut processed = image.clone();
        for preprocessor in &self.preprocessors {
            processed = preprocessor.preprocess(&processed)?;
        }
        Ok(processed)
    }

    /// Contours of a foreground mask that clear the precision's noise floor
    pub fn candidates(&self, mask: &GrayImage) -> Result<Vec<Arc<ContourCandidate>>> {
        let min_area = min_contour_area(self.precision);
        let contours = self.contour_extractor.extract_contours(mask)?;
        let total = contours.len();

        let candidates: Vec<Arc<ContourCandidate>> = contours
            .into_iter()
            .map(ContourCandidate::new)
            .filter(|candidate| candidate.area > min_area)
            .map(Arc::new)
            .collect();

        debug!(total, kept = candidates.len(), min_area, "filtered contours");
        Ok(candidates)
    }

    /// Every hypothesis the detectors produce for a foreground mask
    pub fn hypotheses(&self, mask: &GrayImage) -> Result<Vec<Hypothesis>> {
        let candidates = self.candidates(mask)?;
        Ok(generate_hypotheses(&candidates, self.precision))
    }

    /// Select and enrich the best shape for an already cleaned mask.
    ///
    /// Never fails for lack of shapes: an empty mask yields the fallback circle.
    pub fn process_mask(&self, mask: &GrayImage) -> Result<ShapeRecord> {
        let hypotheses = self.hypotheses(mask)?;
        let record = select_record(&hypotheses, self.hint)
            .with_manufacturing(Manufacturing::for_precision(self.precision));

        info!(
            kind = %record.kind(),
            confidence = record.confidence(),
            hypotheses = hypotheses.len(),
            "sketch shape ready"
        );
        Ok(record)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "SketchPipeline: precision {}, hint {}, {} preprocessors, 1 contour extractor",
            self.precision,
            self.hint,
            self.preprocessors.len()
        )
    }
}

impl std::fmt::Debug for SketchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchPipeline")
            .field("precision", &self.precision)
            .field("hint", &self.hint)
            .field("preprocessors", &self.preprocessors.len())
            .finish()
    }
}
