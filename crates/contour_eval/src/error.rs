use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Failed to open ground truth file {path:?}: {source}")]
    GroundTruthOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save image {path:?}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
