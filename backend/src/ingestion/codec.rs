//! Image transcoding

use image::DynamicImage;
use thiserror::Error;

/// Quality used for lossy WebP output
pub const WEBP_QUALITY: f32 = 99.0;

/// Errors from decoding the source image or encoding the result
#[derive(Error, Debug)]
pub enum CodecError {
    /// The input is corrupt or in an unsupported format
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded image could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Converts arbitrary image bytes to one target format
pub trait ImageCodec: Send + Sync {
    /// File extension of the output, without the dot
    fn extension(&self) -> &'static str;

    /// MIME type of the output
    fn content_type(&self) -> &'static str;

    /// Converts `source` to the target format
    ///
    /// CPU-bound; call from a blocking context.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if `source` cannot be decoded or the result cannot be encoded
    fn encode(&self, source: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Lossy WebP encoder backed by libwebp
#[derive(Debug, Clone, Copy)]
pub struct WebpCodec {
    quality: f32,
}

impl WebpCodec {
    /// Creates an encoder with the given quality (0-100)
    #[must_use]
    pub const fn new(quality: f32) -> Self {
        Self { quality }
    }
}

impl Default for WebpCodec {
    fn default() -> Self {
        Self::new(WEBP_QUALITY)
    }
}

impl ImageCodec for WebpCodec {
    fn extension(&self) -> &'static str {
        "webp"
    }

    fn content_type(&self) -> &'static str {
        "image/webp"
    }

    fn encode(&self, source: &[u8]) -> Result<Vec<u8>, CodecError> {
        let decoded = image::load_from_memory(source)?;

        // libwebp only accepts 8-bit RGB(A) input
        let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());
        let encoder = webp::Encoder::from_image(&rgba)
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        Ok(encoder.encode(self.quality).to_vec())
    }
}
