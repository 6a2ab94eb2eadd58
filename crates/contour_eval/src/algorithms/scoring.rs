use tracing::debug;
use crate::{
    traits::MatchScorer,
    types::{BoundingBox, Contour, DetectionRecord, GroundTruthObject},
};

/// Greedy bounding-box overlap scorer.
///
/// Every detection picks its own best ground truth independently: nothing is
/// consumed, so one reference object can be the best match of several
/// detections. This over-counts when detections outnumber real objects; a
/// one-to-one assignment (e.g. Hungarian matching) would not, but would also
/// change every reported number.
///
/// `false_positives` is the point-count difference between the detection and
/// its best match. Point counts depend on polygon simplification, so treat it
/// as a rough signal only.
#[derive(Debug, Clone, Default)]
pub struct BoundingBoxOverlapScorer;

impl BoundingBoxOverlapScorer {
    /// Percentage of `detected` covered by `reference`; 0 for an empty `detected` box
    pub fn coverage_percentage(detected: &BoundingBox, reference: &BoundingBox) -> f64 {
        let detected_area = detected.area();
        if detected_area == 0 {
            return 0.0;
        }
        let shared = detected.intersection(reference).area();
        100.0 * shared as f64 / detected_area as f64
    }

    fn score_one(&self, detected: &Contour, ground_truth: &[GroundTruthObject]) -> DetectionRecord {
        let detected_rect = detected.bounding_box();
        let detected_matches = detected.len();

        // Before any overlap the best match is "nothing", so the delta is the full point count
        let mut best = DetectionRecord {
            detected_matches,
            ground_truth_matches: 0,
            detection_percentage: 0.0,
            false_positives: detected_matches as i64,
        };

        for reference in ground_truth {
            let percentage = Self::coverage_percentage(&detected_rect, &reference.bounding_box());
            // Strict comparison: the earliest reference wins a tie
            if percentage > best.detection_percentage {
                let ground_truth_matches = reference.point_count();
                best.ground_truth_matches = ground_truth_matches;
                best.detection_percentage = percentage;
                best.false_positives = detected_matches as i64 - ground_truth_matches as i64;
            }
        }

        best
    }
}

impl MatchScorer for BoundingBoxOverlapScorer {
    fn score(&self, detected: &[Contour], ground_truth: &[GroundTruthObject]) -> Vec<DetectionRecord> {
        let records: Vec<DetectionRecord> = detected
            .iter()
            .map(|contour| self.score_one(contour, ground_truth))
            .collect();

        debug!(
            detections = detected.len(),
            ground_truth = ground_truth.len(),
            "scored detections"
        );
        records
    }
}
