pub mod classifier;
pub mod error;
pub mod utils;

pub use classifier::classifier::Classifier;
pub use classifier::types::{FlatTensor, PixelBuffer, Prediction};
pub use error::{Error, Result};
