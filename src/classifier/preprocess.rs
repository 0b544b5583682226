use log::debug;
use ndarray::s;

use super::types::{ChwTensor, FlatTensor, PixelBuffer, RgbTensor};
use crate::error::{Error, Result};

const RGB_CHANNELS: usize = 3;
const MAX_PIXEL_VALUE: f32 = 255.0;

/// Drops every channel past blue, leaving `(rows, cols, 3)`.
pub fn strip_alpha(buffer: &PixelBuffer) -> Result<RgbTensor<u8>> {
    let (rows, cols, channels) = buffer.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidShape(format!(
            "image has no pixels ({}x{})",
            cols, rows
        )));
    }
    if channels < RGB_CHANNELS {
        return Err(Error::InvalidShape(format!(
            "expected at least {} channels, got {}",
            RGB_CHANNELS, channels
        )));
    }
    Ok(buffer.slice(s![.., .., ..RGB_CHANNELS]).to_owned())
}

pub fn to_float(rgb: &RgbTensor<u8>) -> RgbTensor<f32> {
    rgb.mapv(f32::from)
}

/// Moves the channel axis first: `chw[[c, i, j]] == rgb[[i, j, c]]`.
pub fn to_channel_first(rgb: &RgbTensor<f32>) -> Result<ChwTensor> {
    let (_, _, channels) = rgb.dim();
    if channels != RGB_CHANNELS {
        return Err(Error::InvalidShape(format!(
            "expected exactly {} channels, got {}",
            RGB_CHANNELS, channels
        )));
    }
    Ok(rgb
        .view()
        .permuted_axes([2, 0, 1])
        .as_standard_layout()
        .into_owned())
}

/// Scales to [0, 1] and lays the tensor out in (channel, row, column) order.
///
/// Values are divided by 255 without clamping.
pub fn normalize_and_flatten(chw: &ChwTensor) -> Result<FlatTensor> {
    let (channels, rows, cols) = chw.dim();
    if channels != RGB_CHANNELS {
        return Err(Error::InvalidShape(format!(
            "expected {} leading channels, got {}",
            RGB_CHANNELS, channels
        )));
    }

    // iter() follows logical index order regardless of memory layout
    let data: Vec<f32> = chw.iter().map(|v| v / MAX_PIXEL_VALUE).collect();

    Ok(FlatTensor {
        data,
        shape: [channels, rows, cols],
    })
}

/// Runs the whole pipeline from a decoded image to the classifier input.
pub fn preprocess(buffer: &PixelBuffer) -> Result<FlatTensor> {
    let rgb = to_float(&strip_alpha(buffer)?);
    let chw = to_channel_first(&rgb)?;
    let flat = normalize_and_flatten(&chw)?;
    debug!(
        "preprocessed {}x{}x{} image into tensor of shape {:?}",
        buffer.rows(),
        buffer.cols(),
        buffer.channels(),
        flat.shape
    );
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};
    use rand::Rng;

    fn random_buffer(rng: &mut impl Rng, channels: usize) -> PixelBuffer {
        let rows = rng.gen_range(1..8);
        let cols = rng.gen_range(1..8);
        let bytes = (0..rows * cols * channels).map(|_| rng.gen()).collect();
        PixelBuffer::from_interleaved(cols, rows, channels, bytes).unwrap()
    }

    #[test]
    fn test_strip_alpha_keeps_rgb() {
        let mut rng = rand::thread_rng();
        for channels in 3..=5 {
            let buffer = random_buffer(&mut rng, channels);
            let rgb = strip_alpha(&buffer).unwrap();
            let (rows, cols, _) = buffer.dim();
            assert_eq!(rgb.dim(), (rows, cols, 3));
            for ((i, j, c), value) in rgb.indexed_iter() {
                assert_eq!(*value, buffer[[i, j, c]]);
            }
        }
    }

    #[test]
    fn test_strip_alpha_rejects_two_channels() {
        let buffer = PixelBuffer::from_interleaved(2, 2, 2, vec![0; 8]).unwrap();
        assert!(matches!(strip_alpha(&buffer), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_strip_alpha_rejects_empty_image() {
        let buffer = PixelBuffer::from_rgba(0, 3, vec![]).unwrap();
        assert!(matches!(strip_alpha(&buffer), Err(Error::InvalidShape(_))));
        let buffer = PixelBuffer::from_rgba(3, 0, vec![]).unwrap();
        assert!(matches!(strip_alpha(&buffer), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_to_float_keeps_values() {
        let rgb = array![[[0u8, 128, 255]]];
        assert_eq!(to_float(&rgb), array![[[0.0f32, 128.0, 255.0]]]);
    }

    #[test]
    fn test_to_channel_first_permutes_axes() {
        let mut rng = rand::thread_rng();
        let rgb = to_float(&strip_alpha(&random_buffer(&mut rng, 4)).unwrap());
        let chw = to_channel_first(&rgb).unwrap();
        let (rows, cols, _) = rgb.dim();
        assert_eq!(chw.dim(), (3, rows, cols));
        assert_eq!(chw.len(), rgb.len());
        for ((i, j, c), value) in rgb.indexed_iter() {
            assert_eq!(chw[[c, i, j]], *value);
        }
        assert!(chw.is_standard_layout());
    }

    #[test]
    fn test_to_channel_first_rejects_four_channels() {
        let rgba = Array3::<f32>::zeros((2, 2, 4));
        assert!(matches!(
            to_channel_first(&rgba),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_normalize_and_flatten_order() {
        let mut rng = rand::thread_rng();
        let rgb = to_float(&strip_alpha(&random_buffer(&mut rng, 4)).unwrap());
        let chw = to_channel_first(&rgb).unwrap();
        let (_, rows, cols) = chw.dim();

        let flat = normalize_and_flatten(&chw).unwrap();
        assert_eq!(flat.len(), 3 * rows * cols);
        assert_eq!(flat.shape, [3, rows, cols]);

        let mut index = 0;
        for c in 0..3 {
            for i in 0..rows {
                for j in 0..cols {
                    assert_eq!(flat.data[index], chw[[c, i, j]] / 255.0);
                    index += 1;
                }
            }
        }

        let restored = flat.to_array().unwrap();
        assert_eq!(restored, chw.mapv(|v| v / 255.0));
    }

    #[test]
    fn test_normalize_and_flatten_non_standard_layout() {
        // same logical tensor, column-major storage
        let chw = Array3::from_shape_fn((3, 2, 2), |(c, i, j)| (c * 4 + i * 2 + j) as f32);
        let fortran = chw.t().as_standard_layout().into_owned().reversed_axes();
        assert_eq!(fortran, chw);
        let flat = normalize_and_flatten(&fortran).unwrap();
        let expected: Vec<f32> = (0..12).map(|v| v as f32 / 255.0).collect();
        assert_eq!(flat.data, expected);
    }

    #[test]
    fn test_normalize_and_flatten_does_not_clamp() {
        let chw = Array3::from_elem((3, 1, 1), 510.0f32);
        let flat = normalize_and_flatten(&chw).unwrap();
        assert_eq!(flat.data, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_preprocess_solid_red() {
        let bytes = [255u8, 0, 0, 255].repeat(4);
        let buffer = PixelBuffer::from_rgba(2, 2, bytes).unwrap();
        let flat = preprocess(&buffer).unwrap();
        let expected = array![
            [[1.0f32, 1.0], [1.0, 1.0]],
            [[0.0, 0.0], [0.0, 0.0]],
            [[0.0, 0.0], [0.0, 0.0]]
        ];
        assert_eq!(flat.to_array().unwrap(), expected);
    }

    #[test]
    fn test_preprocess_single_pixel() {
        let buffer = PixelBuffer::from_rgba(1, 1, vec![51, 102, 153, 255]).unwrap();
        let flat = preprocess(&buffer).unwrap();
        assert_eq!(flat.shape, [3, 1, 1]);
        let expected = [0.2f32, 0.4, 0.6];
        for (value, expected) in flat.data.iter().zip(expected) {
            assert_relative_eq!(*value, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_preprocess_keeps_spatial_order() {
        // 3 wide, 2 tall, red encodes the pixel position
        let bytes = (0..6u8).flat_map(|p| [p, 0, 0, 255]).collect();
        let buffer = PixelBuffer::from_rgba(3, 2, bytes).unwrap();
        let flat = preprocess(&buffer).unwrap();
        assert_eq!(flat.shape, [3, 2, 3]);
        let red: Vec<f32> = flat.data[..6].iter().map(|v| (v * 255.0).round()).collect();
        assert_eq!(red, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
