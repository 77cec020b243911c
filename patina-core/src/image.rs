//! Image normalization for provider calls.
//!
//! Incoming photos arrive in arbitrary formats and orientations. Before the
//! provider call we decode, rotate upright, flatten to RGB, and downscale to
//! a pixel bound, then re-encode as JPEG to keep payload size (and therefore
//! cost and latency) bounded.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::error::ImageError;

/// Fixed JPEG quality for the normalized image.
pub const JPEG_QUALITY: u8 = 90;

/// Decode, orient, flatten, bound, and re-encode an image.
///
/// - EXIF-style orientation metadata is applied so the output is always
///   upright; a sideways image measurably hurts classification quality.
/// - The output is RGB8, which eliminates alpha-channel and palette-mode
///   edge cases downstream.
/// - Neither dimension of the output exceeds `max_dimension`; aspect ratio
///   is preserved and images are never upscaled. Lanczos3 resampling.
///
/// Idempotent at a fixed bound: re-normalizing the output changes neither
/// its dimensions nor its aspect ratio.
pub fn normalize(data: &[u8], max_dimension: u32) -> Result<Vec<u8>, ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(format!("failed to read image: {}", e)))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    // Orientation must be read before the decoder is consumed. Missing or
    // unreadable metadata means no transform.
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);

    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| ImageError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);

    let mut img = DynamicImage::ImageRgb8(img.to_rgb8());

    if img.width() > max_dimension || img.height() > max_dimension {
        img = img.resize(max_dimension, max_dimension, FilterType::Lanczos3);
    }

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buf.into_inner())
}
