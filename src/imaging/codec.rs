//! Base64 image codec.
//!
//! Images travel over the API as base64 strings. Decoding remembers the
//! format the bytes were in so the composite can be written back in the same
//! format the template was stored in.
//!
//! Output formats: PNG, JPEG and GIF are written as-is. Anything else that
//! can be decoded (WebP) is written as PNG. JPEG output drops the alpha
//! channel.

use super::ImagingError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// A decoded image together with the format it was decoded from.
#[derive(Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("format", &self.format)
            .finish()
    }
}

impl LoadedImage {
    pub fn new(image: DynamicImage, format: ImageFormat) -> Self {
        Self { image, format }
    }
}

/// Encode an image as base64 in (as close as possible to) `format`.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<String, ImagingError> {
    let bytes = encode_bytes(image, format)?;
    Ok(STANDARD.encode(bytes))
}

/// Encode an image to raw bytes in (as close as possible to) `format`.
pub fn encode_bytes(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImagingError> {
    let format = output_format(format);
    let mut buffer = Cursor::new(Vec::new());

    let result = match format {
        ImageFormat::Jpeg if image.color().has_alpha() => {
            DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut buffer, format)
        }
        ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, format),
        _ => image.write_to(&mut buffer, format),
    };

    result.map_err(|e| ImagingError::Encode(format!("{:?}: {}", format, e)))?;
    Ok(buffer.into_inner())
}

/// Decode a base64 string (raw or `data:` URI) into an image.
///
/// Any failure is reported as [`ImagingError::Decode`].
pub fn decode(data: &str) -> Result<LoadedImage, ImagingError> {
    let payload = strip_data_uri(data);
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ImagingError::Decode(format!("invalid base64: {e}")))?;

    decode_bytes(&bytes, "").map_err(|e| match e {
        ImagingError::Load(msg) => ImagingError::Decode(msg),
        other => other,
    })
}

/// Decode raw image bytes. `hint` is a path or URL whose extension is used
/// when the magic bytes are not recognised.
pub fn decode_bytes(bytes: &[u8], hint: &str) -> Result<LoadedImage, ImagingError> {
    let format = detect_image_format(bytes, hint)?;
    let image = image::load(Cursor::new(bytes), format)
        .map_err(|e| ImagingError::Load(format!("{hint}: {e}")))?;
    Ok(LoadedImage::new(image, format))
}

/// Returns true if `data` is a `data:` URI with a base64 payload.
pub fn is_data_uri(data: &str) -> bool {
    data.starts_with("data:") && data.contains(";base64,")
}

fn strip_data_uri(data: &str) -> &str {
    if is_data_uri(data) {
        data.split_once(";base64,").map(|(_, rest)| rest).unwrap_or(data)
    } else {
        data
    }
}

fn output_format(source: ImageFormat) -> ImageFormat {
    match source {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => source,
        _ => ImageFormat::Png,
    }
}

/// Detect image format from bytes or filename extension.
fn detect_image_format(data: &[u8], path: &str) -> Result<ImageFormat, ImagingError> {
    if let Ok(format) = image::guess_format(data) {
        return Ok(format);
    }

    let ext = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "gif" => Ok(ImageFormat::Gif),
        "webp" => Ok(ImageFormat::WebP),
        _ => Err(ImagingError::Load(format!(
            "Unsupported image format: {}",
            if ext.is_empty() { "unknown" } else { &ext }
        ))),
    }
}
