use std::path::Path;

use image::DynamicImage;
use log::debug;

use crate::classifier::types::PixelBuffer;
use crate::error::Result;

/// Converts any decoded image to an 8-bit RGBA buffer.
pub fn pixel_buffer_from_image(image: &DynamicImage) -> Result<PixelBuffer> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width as usize, height as usize, rgba.into_raw())
}

pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let image = image::open(path)?;
    debug!(
        "decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    pixel_buffer_from_image(&image)
}

pub fn decode_image_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let image = image::load_from_memory(bytes)?;
    pixel_buffer_from_image(&image)
}
