pub mod builder;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};
use crate::{
    algorithms::to_grayscale,
    config::EvaluationConfig,
    error::Result,
    traits::{ContourExtractor, ContourFilter, ImagePreprocessor, MatchScorer},
    types::{Contour, Evaluation, EvaluationSummary, GroundTruthObject},
};

/// Detection-and-evaluation pipeline: binarize, extract, filter, score.
///
/// Each stage consumes its whole input before the next one starts and
/// returns freshly built output.
pub struct Pipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    filters: Vec<Box<dyn ContourFilter>>,
    scorer: Box<dyn MatchScorer>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Standard pipeline with the thresholds from `config`
    pub fn from_config(config: &EvaluationConfig) -> Result<Self> {
        Ok(builder::PipelineBuilder::from_config(config)?.build())
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        filters: Vec<Box<dyn ContourFilter>>,
        scorer: Box<dyn MatchScorer>,
    ) -> Self {
        Self {
            preprocessors,
            contour_extractor,
            filters,
            scorer,
        }
    }

    /// Run every preprocessor in sequence, producing the binary mask
    pub fn binarize(&self, image: &GrayImage) -> Result<GrayImage> {
        let mut processed_image = image.clone();
        for preprocessor in &self.preprocessors {
            processed_image = preprocessor.preprocess(&processed_image)?;
        }
        Ok(processed_image)
    }

    /// Apply the filters in order; survivors keep their relative order
    pub fn filter(&self, contours: Vec<Contour>) -> Vec<Contour> {
        self.filters
            .iter()
            .fold(contours, |remaining, filter| filter.filter(remaining))
    }

    /// Binarize, extract and filter: the plausible detections in scan order
    pub fn detect(&self, image: &GrayImage) -> Result<Vec<Contour>> {
        let mask = self.binarize(image)?;
        let contours = self.contour_extractor.extract_contours(&mask)?;
        let extracted = contours.len();

        let detections = self.filter(contours);
        debug!(extracted, kept = detections.len(), "filtered contours");
        Ok(detections)
    }

    /// Full run against a set of reference outlines
    pub fn evaluate(&self, image: &DynamicImage, ground_truth: &[GroundTruthObject]) -> Result<Evaluation> {
        let gray = to_grayscale(image);
        let detections = self.detect(&gray)?;
        let records = self.scorer.score(&detections, ground_truth);
        let summary = EvaluationSummary::from_records(&records, ground_truth.len());

        info!(
            detections = summary.detections,
            matched = summary.matched_detections,
            ground_truth = summary.ground_truth_objects,
            mean_percentage = summary.mean_detection_percentage,
            "evaluation finished"
        );

        Ok(Evaluation {
            detections,
            records,
            summary,
            image_width: gray.width(),
            image_height: gray.height(),
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} preprocessors, 1 contour extractor, {} filters, 1 scorer",
            self.preprocessors.len(),
            self.filters.len()
        )
    }
}
