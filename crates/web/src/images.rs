//! Menu photo processing.
//!
//! Uploaded photos are normalized before storage: decoded from whatever
//! format the browser sent, downscaled to a bounded width, re-encoded as
//! JPEG and embedded as a data URL. Items carry their image inline, so
//! no file hosting is involved.

use base64::Engine as _;
use image::{GenericImageView, ImageFormat, codecs::jpeg::JpegEncoder};
use thiserror::Error;

/// Widest an embedded menu photo is allowed to be, in pixels.
/// Narrower uploads keep their size; no upscaling.
pub const MAX_WIDTH: u32 = 800;

/// JPEG quality for re-encoded photos.
const JPEG_QUALITY: u8 = 70;

/// Errors from photo processing.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The bytes are not a decodable image.
    #[error("arquivo não é uma imagem válida")]
    Undecodable(#[source] image::ImageError),

    /// Re-encoding to JPEG failed.
    #[error("falha ao processar a imagem")]
    Encode(#[source] image::ImageError),
}

/// Normalize an uploaded photo into a JPEG data URL.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded as an image or the
/// JPEG re-encode fails.
pub fn process_upload(bytes: &[u8]) -> Result<String, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageError::Undecodable)?;

    let (width, height) = decoded.dimensions();
    let resized = if width > MAX_WIDTH {
        // resize() preserves aspect ratio within the bounding box
        decoded.resize(MAX_WIDTH, u32::MAX, image::imageops::FilterType::Triangle)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(ImageError::Encode)?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&jpeg);
    Ok(format!("data:image/jpeg;base64,{encoded}"))
}

/// Whether the stored image value is an embedded data URL (as opposed to
/// a plain http(s) URL carried over from the seed catalog).
#[must_use]
pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:image/")
}
