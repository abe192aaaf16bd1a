use fabricator_common::{Precision, ShapeHint};

use crate::{
    algorithms::{
        AdaptiveThresholdPreprocessor, ExternalContourExtractor, GaussianBlurPreprocessor,
        MorphologyPreprocessor,
    },
    pipeline::SketchPipeline,
    traits::{ContourExtractor, ImagePreprocessor},
};

/// Builder for sketch pipelines with a fluent API
pub struct SketchPipelineBuilder {
    precision: Precision,
    hint: ShapeHint,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
}

impl SketchPipelineBuilder {
    /// Create a builder with no preprocessing stages and no shape hint
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            hint: ShapeHint::Auto,
            preprocessors: Vec::new(),
            contour_extractor: None,
        }
    }

    pub fn hint(mut self, hint: ShapeHint) -> Self {
        self.hint = hint;
        self
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Precision-scaled blur, adaptive threshold, then close and open
    pub fn with_standard_preprocessing(self) -> Self {
        let blur = GaussianBlurPreprocessor::for_precision(self.precision);
        self.add_preprocessor(blur)
            .add_preprocessor(AdaptiveThresholdPreprocessor::default())
            .add_preprocessor(MorphologyPreprocessor::close())
            .add_preprocessor(MorphologyPreprocessor::open())
    }

    /// Build the pipeline, defaulting to external contour extraction
    pub fn build(self) -> SketchPipeline {
        let contour_extractor = self
            .contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        SketchPipeline::from_parts(self.precision, self.hint, self.preprocessors, contour_extractor)
    }
}
