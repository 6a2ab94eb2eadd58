use image::GrayImage;
use crate::{
    error::Result,
    types::{Contour, DetectionRecord, GroundTruthObject},
};

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image (e.g., blur, threshold)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract contours from a binary image
    fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Contour>>;
}

/// Trait for contour plausibility filters
pub trait ContourFilter: Send + Sync {
    /// Whether a contour survives this filter
    fn accepts(&self, contour: &Contour) -> bool;

    /// Drop rejected contours, keeping the survivors in their original order
    fn filter(&self, mut contours: Vec<Contour>) -> Vec<Contour> {
        contours.retain(|contour| self.accepts(contour));
        contours
    }
}

/// Trait for scoring detections against ground truth
pub trait MatchScorer: Send + Sync {
    /// Produce one record per detected contour, in the same order
    fn score(&self, detected: &[Contour], ground_truth: &[GroundTruthObject]) -> Vec<DetectionRecord>;
}

/// Destination for scored detection records
pub trait ReportSink {
    fn write_records(&mut self, records: &[DetectionRecord]) -> Result<()>;
}
