//! Image XObject handling: JPEG passthrough and PNG re-encoding.

use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Object, ObjectId, Stream};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Jpeg,
    Png,
}

/// An image ready to embed as a PDF Image XObject.
///
/// JPEG data is embedded verbatim with DCTDecode. PNG data is decoded and
/// re-encoded as raw samples with FlateDecode; an alpha channel, if present,
/// is carried separately and becomes an SMask stream so transparency (e.g.
/// the corners of a circle-masked photo) survives into the PDF.
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    bits_per_component: u8,
    filter: &'static str,
    data: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Build from raw bytes, sniffing the format from magic numbers.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// JPEG passthrough: parse dimensions from the SOF marker, keep the
    /// compressed data as-is.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, components) = jpeg_info(data)?;
        let color_space = match components {
            1 => "DeviceGray",
            3 => "DeviceRGB",
            4 => "DeviceCMYK",
            n => {
                return Err(PdfError::ImageError(format!(
                    "unsupported JPEG component count: {n}"
                )))
            }
        };
        Ok(ImageXObject {
            width,
            height,
            color_space,
            bits_per_component: 8,
            filter: "DCTDecode",
            data: data.to_vec(),
            alpha: None,
        })
    }

    /// Decode a PNG and re-encode its samples with FlateDecode.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        use ::image::GenericImageView;

        let img = ::image::load_from_memory_with_format(data, ::image::ImageFormat::Png)
            .map_err(|e| PdfError::ImageError(format!("failed to decode PNG: {e}")))?;
        let (width, height) = img.dimensions();

        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for pixel in rgba.pixels() {
                rgb.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }
            return Ok(ImageXObject {
                width,
                height,
                color_space: "DeviceRGB",
                bits_per_component: 8,
                filter: "FlateDecode",
                data: flate_compress(&rgb)?,
                alpha: Some(flate_compress(&alpha)?),
            });
        }

        let (color_space, raw) = if img.color().has_color() {
            ("DeviceRGB", img.to_rgb8().into_raw())
        } else {
            ("DeviceGray", img.to_luma8().into_raw())
        };
        Ok(ImageXObject {
            width,
            height,
            color_space,
            bits_per_component: 8,
            filter: "FlateDecode",
            data: flate_compress(&raw)?,
            alpha: None,
        })
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// The image stream, referencing `smask_id` when the image carries alpha.
    pub fn to_stream(&self, smask_id: Option<ObjectId>) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => self.bits_per_component as i64,
            "Filter" => self.filter,
        };
        if let Some(id) = smask_id {
            dict.set("SMask", Object::Reference(id));
        }
        Stream::new(dict, self.data.clone())
    }

    /// The SMask stream for the alpha channel, if any.
    pub fn alpha_stream(&self) -> Option<Stream> {
        let alpha = self.alpha.as_ref()?;
        Some(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            alpha.clone(),
        ))
    }
}

impl std::fmt::Debug for ImageXObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageXObject")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_space", &self.color_space)
            .field("filter", &self.filter)
            .field("has_alpha", &self.has_alpha())
            .finish()
    }
}

/// Operators placing an image resource into the given rectangle. The unit
/// square is scaled to `width` x `height`, so the image stretches to the box.
pub fn generate_image_operators(resource: &str, x: f64, y: f64, width: f64, height: f64) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{resource} Do\nQ\n").into_bytes()
}

fn flate_compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }
    if data.len() >= 8 && data[..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }
    Err(PdfError::ImageError(
        "unrecognized image format (expected JPEG or PNG)".to_string(),
    ))
}

/// Scan JPEG markers for the start-of-frame segment and read
/// (width, height, components) from it.
fn jpeg_info(data: &[u8]) -> Result<(u32, u32, u8)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::ImageError("not a JPEG".to_string()));
    }
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOF0-SOF15, excluding DHT/JPG/DAC
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let components = data[i + 9];
            return Ok((width, height, components));
        }
        if marker == 0xD8 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length;
    }
    Err(PdfError::ImageError(
        "no SOF marker found in JPEG".to_string(),
    ))
}
