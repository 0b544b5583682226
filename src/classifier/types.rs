use std::ops;

use ndarray::Array3;

use crate::error::{Error, Result};

/// Decoded image indexed `(row, column, channel)`, 8 bits per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer(pub Array3<u8>);

impl PixelBuffer {
    /// Wraps interleaved RGBA bytes of a `width` x `height` image.
    pub fn from_rgba(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        Self::from_interleaved(width, height, 4, bytes)
    }

    pub fn from_interleaved(
        width: usize,
        height: usize,
        channels: usize,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(channels))
            .ok_or_else(|| {
                Error::InvalidShape(format!(
                    "image size {}x{}x{} overflows",
                    width, height, channels
                ))
            })?;
        if bytes.len() != expected {
            return Err(Error::InvalidShape(format!(
                "data length ({}) does not match the image size ({})",
                bytes.len(),
                expected
            )));
        }
        Ok(Self(Array3::from_shape_vec((height, width, channels), bytes)?))
    }

    pub fn rows(&self) -> usize {
        self.0.dim().0
    }

    pub fn cols(&self) -> usize {
        self.0.dim().1
    }

    pub fn channels(&self) -> usize {
        self.0.dim().2
    }
}

impl ops::Deref for PixelBuffer {
    type Target = Array3<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Image without alpha, `(row, column, channel)` with 3 channels.
pub type RgbTensor<T> = Array3<T>;

/// Channel-first tensor, `(channel, row, column)`.
pub type ChwTensor = Array3<f32>;

/// Per-class scores in label order.
pub type ClassScores = Vec<f32>;

/// A CHW tensor laid out contiguously in `(channel, row, column)` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTensor {
    pub data: Vec<f32>,
    /// `(channels, rows, columns)`
    pub shape: [usize; 3],
}

impl FlatTensor {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shape with a leading batch axis of one, as image classifiers expect.
    pub fn with_batch_axis(&self) -> [usize; 4] {
        [1, self.shape[0], self.shape[1], self.shape[2]]
    }

    /// Re-reads the flat data with the declared shape.
    pub fn to_array(&self) -> Result<ChwTensor> {
        Ok(Array3::from_shape_vec(self.shape, self.data.clone())?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub score: f32,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Class Detected: {}", self.label)
    }
}
