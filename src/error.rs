use std::error::Error as E;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(String),
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    #[error("Inference engine returned no scores")]
    EmptyScores,
    #[error("No label for class index {0}")]
    UnknownLabel(usize),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("A recognition is already running")]
    Busy,
    #[error("Recognition worker stopped before publishing a result")]
    WorkerGone,
    #[error("Inference error: {0}")]
    Inference(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] ort::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn from_error(error: &dyn E) -> Self {
        Error::Error(error.to_string())
    }
}
