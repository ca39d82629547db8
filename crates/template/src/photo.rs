//! Photo compositing: circular masking and PNG normalization.

use crate::schema::{PhotoBox, PhotoShape};
use crate::{Result, TemplateError};
use image::imageops::FilterType;
use std::io::Cursor;

/// Resize to `size` x `size` and zero the alpha of every pixel outside the
/// centered inscribed circle. Returns PNG bytes.
pub fn mask_to_circle(data: &[u8], size: u32) -> Result<Vec<u8>> {
    if size == 0 {
        return Err(TemplateError::ImageError(
            "mask size must be positive".to_string(),
        ));
    }
    let img = image::load_from_memory(data)
        .map_err(|e| TemplateError::ImageError(format!("failed to decode photo: {e}")))?;
    let mut rgba = img
        .resize_exact(size, size, FilterType::Lanczos3)
        .to_rgba8();

    let radius = size as f32 / 2.0;
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }
    encode_png(image::DynamicImage::ImageRgba8(rgba))
}

/// Decode arbitrary image bytes and re-encode as PNG at native size.
pub fn reencode_png(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| TemplateError::ImageError(format!("failed to decode photo: {e}")))?;
    encode_png(img)
}

/// Prepare photo bytes for a photo box: a circular box with a positive
/// target size gets the circle mask, everything else a plain PNG re-encode.
/// The target size is the box width, falling back to its height.
pub fn composite_for_box(data: &[u8], placement: &PhotoBox) -> Result<Vec<u8>> {
    let side = if placement.w > 0.0 {
        placement.w
    } else {
        placement.h
    };
    let target = side.round().max(0.0) as u32;
    if placement.shape == PhotoShape::Circle && target > 0 {
        mask_to_circle(data, target)
    } else {
        reencode_png(data)
    }
}

fn encode_png(img: image::DynamicImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| TemplateError::ImageError(format!("failed to encode PNG: {e}")))?;
    Ok(out)
}
