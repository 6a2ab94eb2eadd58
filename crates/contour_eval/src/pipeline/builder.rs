use crate::{
    algorithms::{
        filters_from_config, preprocessors_from_config, BoundingBoxOverlapScorer,
        ImageprocContourExtractor,
    },
    config::EvaluationConfig,
    error::Result,
    pipeline::Pipeline,
    traits::{ContourExtractor, ContourFilter, ImagePreprocessor, MatchScorer},
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    filters: Vec<Box<dyn ContourFilter>>,
    scorer: Option<Box<dyn MatchScorer>>,
}

impl PipelineBuilder {
    /// Create an empty builder: no preprocessing and no filtering
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            contour_extractor: None,
            filters: Vec::new(),
            scorer: None,
        }
    }

    /// Blur + threshold preprocessing and area + aspect filtering from `config`
    pub fn from_config(config: &EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessors: preprocessors_from_config(&config.preprocess)?,
            contour_extractor: None,
            filters: filters_from_config(&config.filter),
            scorer: None,
        })
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

    /// Append a contour filter; filters run in insertion order
    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: ContourFilter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Set the match scorer (replaces any existing one)
    pub fn set_scorer<S>(mut self, scorer: S) -> Self
    where
        S: MatchScorer + 'static,
    {
        self.scorer = Some(Box::new(scorer));
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        let scorer = self.scorer
            .unwrap_or_else(|| Box::new(BoundingBoxOverlapScorer));

        Pipeline::new(
            self.preprocessors,
            contour_extractor,
            self.filters,
            scorer,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::MinimumAreaFilter,
        types::{Contour, DetectionRecord, GroundTruthObject, Point},
    };
    use image::{DynamicImage, GrayImage};

    /// Reports one fixed square regardless of the mask
    struct FixedExtractor;

    impl ContourExtractor for FixedExtractor {
        fn extract_contours(&self, _image: &GrayImage) -> Result<Vec<Contour>> {
            Ok(vec![
                [(0, 0), (0, 19), (19, 19), (19, 0)].into_iter().map(Point::from).collect(),
                [(40, 40), (41, 40), (41, 41)].into_iter().map(Point::from).collect(),
            ])
        }
    }

    /// Marks every detection as a full match
    struct PerfectScorer;

    impl MatchScorer for PerfectScorer {
        fn score(&self, detected: &[Contour], _ground_truth: &[GroundTruthObject]) -> Vec<DetectionRecord> {
            detected
                .iter()
                .map(|contour| DetectionRecord {
                    detected_matches: contour.len(),
                    ground_truth_matches: contour.len(),
                    detection_percentage: 100.0,
                    false_positives: 0,
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_extractor_and_scorer_are_used() {
        let pipeline = PipelineBuilder::new()
            .set_contour_extractor(FixedExtractor)
            .add_filter(MinimumAreaFilter::default())
            .set_scorer(PerfectScorer)
            .build();

        let evaluation = pipeline
            .evaluate(&DynamicImage::ImageLuma8(GrayImage::new(8, 8)), &[])
            .expect("Should evaluate");

        assert_eq!(evaluation.detections.len(), 1);
        assert_eq!(evaluation.records.len(), 1);
        assert_eq!(evaluation.records[0].detection_percentage, 100.0);
        assert_eq!(evaluation.records[0].false_positives, 0);
        assert_eq!(pipeline.info(), "Pipeline: 0 preprocessors, 1 contour extractor, 1 filters, 1 scorer");
    }

    #[test]
    fn test_defaults_fill_missing_stages() {
        let pipeline = PipelineBuilder::default().build();
        let evaluation = pipeline
            .evaluate(&DynamicImage::ImageLuma8(GrayImage::new(8, 8)), &[])
            .expect("Should evaluate");
        assert!(evaluation.detections.is_empty());
        assert!(evaluation.records.is_empty());
    }
}
