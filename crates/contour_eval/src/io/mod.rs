pub mod ground_truth;
pub mod report;
pub mod overlay;

pub use ground_truth::GroundTruthStore;
pub use report::{write_report, CsvReportSink, JsonReportSink, ReportFormat, ReportRow, REPORT_HEADERS};
pub use overlay::{render_overlay, save_overlay};

use std::path::Path;
use image::DynamicImage;
use tracing::info;
use crate::error::Result;

/// Decode an image file; any decoding failure is fatal for the run
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "loaded image");
    Ok(image)
}
