//! Imaging error types.
//!
//! Defines errors that can occur while loading, masking, compositing and
//! encoding images.

use std::fmt;

/// Errors that can occur during image processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagingError {
    /// Source image could not be fetched or decoded (path or URL)
    Load(String),

    /// Supplied inline image bytes are not valid image data
    Decode(String),

    /// Failed to encode the output image
    Encode(String),

    /// Requested geometry cannot be processed
    Geometry(String),
}

impl fmt::Display for ImagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(msg) => write!(f, "Failed to load image: {}", msg),
            Self::Decode(msg) => write!(f, "Failed to decode image: {}", msg),
            Self::Encode(msg) => write!(f, "Failed to encode image: {}", msg),
            Self::Geometry(msg) => write!(f, "Invalid geometry: {}", msg),
        }
    }
}

impl std::error::Error for ImagingError {}
