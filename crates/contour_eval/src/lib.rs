//! # Contour Detection Evaluation Library
//!
//! Detects object outlines in a raster image and scores each detection
//! against reference (ground-truth) outlines from an annotation file.
//!
//! ## Stages
//!
//! - **Preprocessing**: grayscale, 5x5 binomial blur, fixed threshold
//! - **Extraction**: outermost borders only, straight runs compressed
//! - **Filtering**: minimum area, then minimum aspect ratio
//! - **Scoring**: greedy best bounding-box overlap per detection
//! - **Output**: CSV/JSON report sinks and an annotated result image
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contour_eval::{EvaluationConfig, GroundTruthStore, Pipeline, ReportFormat};
//!
//! let pipeline = Pipeline::from_config(&EvaluationConfig::default())?;
//! let image = contour_eval::load_image("j1.jpg")?;
//! let ground_truth = GroundTruthStore::load("j1.jpg.json")?;
//!
//! let evaluation = pipeline.evaluate(&image, ground_truth.objects())?;
//! contour_eval::write_report("report.csv", ReportFormat::Csv, &evaluation.records)?;
//! contour_eval::save_overlay("result.jpg", &image, &evaluation.detections)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use contour_eval::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .add_preprocessor(BinomialBlurPreprocessor::new(3)?)
//!     .add_preprocessor(ThresholdPreprocessor { threshold: 100 })
//!     .add_filter(MinimumAreaFilter { min_area: 250.0 })
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{EvalError, Result};
pub use types::{
    BoundingBox, Contour, DetectionRecord, Evaluation, EvaluationSummary, GroundTruthObject, Point,
};
pub use config::{EvaluationConfig, FilterConfig, PreprocessConfig};
pub use traits::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::*;
