use std::time::Instant;

use log::{debug, info};

use super::engine::InferenceEngine;
use super::preprocess::preprocess;
use super::types::{PixelBuffer, Prediction};
use crate::error::{Error, Result};
use crate::utils::array::argmax;

#[cfg(feature = "onnx")]
use super::{config::ClassifierConfig, engine::OrtEngine};

/// Image classifier: preprocessing, an inference engine and a label table.
pub struct Classifier<E: InferenceEngine> {
    engine: E,
    labels: Vec<String>,
}

impl<E: InferenceEngine> Classifier<E> {
    pub fn new(engine: E, labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::InvalidConfig("label list is empty".to_string()));
        }
        Ok(Self { engine, labels })
    }

    pub fn classify(&mut self, image: &PixelBuffer) -> Result<Prediction> {
        let start = Instant::now();
        let input = preprocess(image)?;
        let scores = self.engine.infer(&input)?;
        debug!("inference took {:?}, scores {:?}", start.elapsed(), scores);

        let prediction = self.predict(&scores)?;
        info!("{} (score {})", prediction, prediction.score);
        Ok(prediction)
    }

    /// Picks the best scoring label.
    pub fn predict(&self, scores: &[f32]) -> Result<Prediction> {
        let index = argmax(scores)?;
        let label = self
            .labels
            .get(index)
            .ok_or(Error::UnknownLabel(index))?;

        Ok(Prediction {
            index,
            label: label.clone(),
            score: scores[index],
        })
    }
}

#[cfg(feature = "onnx")]
impl Classifier<OrtEngine> {
    /// Loads the model named in `config`, copying it into `asset_dir` first when set.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let model_path = config.resolve_model_path()?;
        Self::new(OrtEngine::new(model_path)?, config.labels.clone())
    }
}
