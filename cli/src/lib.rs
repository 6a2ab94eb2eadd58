use clap::Args;
use contour_eval::{EvaluationConfig, ReportFormat};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Missing 'image_path' field; pass --image or set it in the config file")]
    MissingImagePath,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Inputs, outputs and thresholds for one evaluation run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Image to evaluate
    pub image_path: Option<PathBuf>,
    /// Annotation file; defaults to the image path with `.json` appended
    pub ground_truth_path: Option<PathBuf>,
    /// Report destination; defaults to `report.<format extension>`
    pub report_path: Option<PathBuf>,
    pub report_format: ReportFormat,
    /// Annotated copy of the input; omitted means no image is written
    pub overlay_path: Option<PathBuf>,
    pub evaluation: EvaluationConfig,
}

/// Command-line values that take precedence over the config file
#[derive(Args, Debug, Clone, Default)]
pub struct RunOverrides {
    /// Path to the input image
    #[arg(short, long)]
    pub image: Option<PathBuf>,
    /// Path to the annotation file (defaults to <IMAGE>.json)
    #[arg(short, long)]
    pub ground_truth: Option<PathBuf>,
    /// Where to write the report (defaults to report.<FORMAT>)
    #[arg(short, long)]
    pub report: Option<PathBuf>,
    /// Report format
    #[arg(short, long)]
    pub format: Option<ReportFormat>,
    /// Where to write the annotated result image
    #[arg(long, conflicts_with = "no_overlay")]
    pub overlay: Option<PathBuf>,
    /// Skip writing the annotated result image
    #[arg(long)]
    pub no_overlay: bool,
    /// Minimum contour area in square pixels
    #[arg(long)]
    pub min_area: Option<f64>,
    /// Minimum bounding-box width/height ratio
    #[arg(long)]
    pub min_aspect_ratio: Option<f64>,
    /// Binarization cutoff (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,
    /// Smoothing kernel size (odd)
    #[arg(long)]
    pub blur_kernel_size: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            ground_truth_path: None,
            report_path: None,
            report_format: ReportFormat::Csv,
            overlay_path: Some(PathBuf::from("result.jpg")),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn image_path(&self) -> Result<&Path, CliError> {
        self.image_path.as_deref().ok_or(CliError::MissingImagePath)
    }

    /// Explicit annotation path, or `<image>.json` next to the image
    pub fn ground_truth_path(&self) -> Result<PathBuf, CliError> {
        if let Some(path) = &self.ground_truth_path {
            return Ok(path.clone());
        }
        let mut derived = self.image_path()?.as_os_str().to_owned();
        derived.push(".json");
        Ok(PathBuf::from(derived))
    }

    /// Explicit report path, or `report.csv` / `report.json` by format
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("report.{}", self.report_format.extension())))
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn apply_overrides(&mut self, overrides: RunOverrides) {
        if let Some(image) = overrides.image {
            self.image_path = Some(image);
        }
        if let Some(ground_truth) = overrides.ground_truth {
            self.ground_truth_path = Some(ground_truth);
        }
        if let Some(report) = overrides.report {
            self.report_path = Some(report);
        }
        if let Some(format) = overrides.format {
            self.report_format = format;
        }
        if let Some(overlay) = overrides.overlay {
            self.overlay_path = Some(overlay);
        }
        if overrides.no_overlay {
            self.overlay_path = None;
        }

        let evaluation = &mut self.evaluation;
        if let Some(min_area) = overrides.min_area {
            evaluation.filter.min_area = min_area;
        }
        if let Some(min_aspect_ratio) = overrides.min_aspect_ratio {
            evaluation.filter.min_aspect_ratio = min_aspect_ratio;
        }
        if let Some(threshold) = overrides.threshold {
            evaluation.preprocess.threshold = threshold;
        }
        if let Some(blur_kernel_size) = overrides.blur_kernel_size {
            evaluation.preprocess.blur_kernel_size = blur_kernel_size;
        }
    }

    /// Load RunConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load RunConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load RunConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load RunConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Save RunConfig to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert RunConfig to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert RunConfig to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// JSON schema describing the config file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RunConfig)
    }
}
