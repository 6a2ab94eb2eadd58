use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Closed polygon boundary, points in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert to geo-types Polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let exterior_coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|p| Coord {
                x: f64::from(p.x),
                y: f64::from(p.y),
            })
            .collect();

        Polygon::new(LineString::new(exterior_coords), vec![])
    }

    /// Enclosed area in square pixels (absolute shoelace area).
    /// Contours with fewer than three points have zero area.
    pub fn area(&self) -> f64 {
        use geo::Area;
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_geo_polygon().unsigned_area()
    }

    /// Smallest axis-aligned rectangle enclosing every point.
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox::default();
        };

        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);

        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x.abs_diff(min_x) + 1,
            height: max_y.abs_diff(min_y) + 1,
        }
    }
}

impl FromIterator<Point> for Contour {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Axis-aligned rectangle in pixel units.
///
/// `width` and `height` count pixels inclusively, so a single point has a
/// 1x1 box. Only an empty contour yields a zero-sized box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Overlapping rectangle, or an empty box when the two are disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        let width = right - i64::from(left);
        let height = bottom - i64::from(top);
        if width <= 0 || height <= 0 {
            return BoundingBox::default();
        }

        BoundingBox {
            x: left,
            y: top,
            width: width as u32,
            height: height as u32,
        }
    }

    /// `width / height`, or `None` for a zero-height box.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }
}

/// Reference outline loaded from the annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthObject {
    pub contour: Contour,
}

impl GroundTruthObject {
    pub fn new(contour: Contour) -> Self {
        Self { contour }
    }

    pub fn point_count(&self) -> usize {
        self.contour.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.contour.bounding_box()
    }
}

/// Best-match metrics for one detected contour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Point count of the detected contour
    pub detected_matches: usize,
    /// Point count of the best-matching ground truth, 0 when nothing overlaps
    pub ground_truth_matches: usize,
    /// Share of the detected bounding box covered by the best ground truth box, in [0, 100]
    pub detection_percentage: f64,
    /// `detected_matches - ground_truth_matches`; may be negative
    pub false_positives: i64,
}

/// Aggregate numbers over one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub detections: usize,
    pub ground_truth_objects: usize,
    /// Detections whose best match overlaps a ground truth at all
    pub matched_detections: usize,
    pub mean_detection_percentage: f64,
}

impl EvaluationSummary {
    pub fn from_records(records: &[DetectionRecord], ground_truth_objects: usize) -> Self {
        let matched_detections = records
            .iter()
            .filter(|r| r.detection_percentage > 0.0)
            .count();

        let mean_detection_percentage = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.detection_percentage).sum::<f64>() / records.len() as f64
        };

        Self {
            detections: records.len(),
            ground_truth_objects,
            matched_detections,
            mean_detection_percentage,
        }
    }
}

/// Output of a full run: the surviving detections and one record per detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub detections: Vec<Contour>,
    pub records: Vec<DetectionRecord>,
    pub summary: EvaluationSummary,
    pub image_width: u32,
    pub image_height: u32,
}
