#[cfg(feature = "onnx")]
use std::path::PathBuf;

#[cfg(feature = "onnx")]
use ort::{session::Session, value::Tensor};

use super::types::{ClassScores, FlatTensor};
use crate::error::{Error, Result};

/// Evaluates a classifier on a channel-first tensor.
///
/// Implementations return one score per class, in label order.
pub trait InferenceEngine: Send {
    fn infer(&mut self, input: &FlatTensor) -> Result<ClassScores>;
}

/// Engine backed by a closure.
pub struct FnEngine<F>(pub F);

impl<F> InferenceEngine for FnEngine<F>
where
    F: FnMut(&FlatTensor) -> Result<ClassScores> + Send,
{
    fn infer(&mut self, input: &FlatTensor) -> Result<ClassScores> {
        (self.0)(input)
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn infer(&mut self, input: &FlatTensor) -> Result<ClassScores> {
        (**self).infer(input)
    }
}

/// Shape to feed a model whose input has `rank` axes.
///
/// Rank 3 takes the `(3, H, W)` tensor as is, rank 4 gets a batch axis of one.
pub fn input_shape(input: &FlatTensor, rank: usize) -> Result<Vec<usize>> {
    match rank {
        3 => Ok(input.shape.to_vec()),
        4 => Ok(input.with_batch_axis().to_vec()),
        _ => Err(Error::InvalidShape(format!(
            "model expects a rank {} input, only rank 3 or 4 is supported",
            rank
        ))),
    }
}

/// ONNX Runtime session fed with a `(3, H, W)` or `(1, 3, H, W)` float tensor.
#[cfg(feature = "onnx")]
pub struct OrtEngine {
    pub session: Session,
    input_rank: usize,
}

#[cfg(feature = "onnx")]
impl OrtEngine {
    pub fn new(model_path: PathBuf) -> Result<Self> {
        let session = Session::builder()?.commit_from_file(&model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::Inference("model has no inputs".to_string()))?;
        let input_rank = input
            .input_type
            .tensor_shape()
            .ok_or_else(|| Error::Inference("model input is not a tensor".to_string()))?
            .len();
        log::info!(
            "loaded model {} (input rank {})",
            model_path.display(),
            input_rank
        );

        Ok(Self {
            session,
            input_rank,
        })
    }
}

#[cfg(feature = "onnx")]
impl InferenceEngine for OrtEngine {
    fn infer(&mut self, input: &FlatTensor) -> Result<ClassScores> {
        let shape = input_shape(input, self.input_rank)?;
        let tensor = Tensor::from_array((shape, input.data.clone()))?;
        let outputs = self.session.run(ort::inputs![tensor])?;
        if outputs.is_empty() {
            return Err(Error::Inference("model produced no outputs".to_string()));
        }
        let (_, scores) = outputs[0].try_extract_tensor::<f32>()?;
        Ok(scores.to_vec())
    }
}
