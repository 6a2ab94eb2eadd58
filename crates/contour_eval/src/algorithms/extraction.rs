use image::GrayImage;
use imageproc::contours::BorderType;
use tracing::debug;
use crate::{error::Result, traits::ContourExtractor, types::{Contour, Point}};

/// Imageproc-based contour extractor.
///
/// Keeps only outermost borders (no holes, nothing nested inside a hole) and
/// compresses straight runs so each contour holds only its turning points.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, binary_image: &GrayImage) -> Result<Vec<Contour>> {
        let contours = imageproc::contours::find_contours::<i32>(binary_image);
        let total = contours.len();

        let result: Vec<Contour> = contours
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                let points = contour.points
                    .iter()
                    .map(|p| Point::new(p.x, p.y))
                    .collect();
                Contour::new(compress_collinear(points))
            })
            .collect();

        debug!(total, external = result.len(), "extracted contours");
        Ok(result)
    }
}

/// Drop every point that continues the direction of the previous step,
/// treating the sequence as a closed loop.
pub fn compress_collinear(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let step = |from: Point, to: Point| ((to.x - from.x).signum(), (to.y - from.y).signum());

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            step(prev, cur) != step(cur, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        // Fully degenerate loop; keep the start so the contour is not lost
        vec![points[0]]
    } else {
        kept
    }
}
