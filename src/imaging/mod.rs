//! Imaging module: loading, masking, compositing and encoding.
//!
//! This module holds everything that touches pixels. It knows nothing about
//! catalogs or names; callers resolve templates, positions and designs first
//! and hand over decoded images and rectangles.
//!
//! # Pipeline
//!
//! 1. [`ImageLoader`] turns an [`ImageSource`] into a [`LoadedImage`]
//! 2. [`build_mask`] derives the design luminance and its alpha mask
//! 3. [`paste`] or [`outline`] produces a new image from the template
//! 4. [`encode`] writes the result as base64 in the template's format

pub mod codec;
pub mod compositor;
pub mod error;
pub mod mask;
pub mod rect;
pub mod source;

// Re-export main types for convenience
pub use codec::{decode, decode_bytes, encode, encode_bytes, LoadedImage};
pub use compositor::{outline, paste, OutlineStyle};
pub use error::ImagingError;
pub use mask::{build_mask, invert, to_luminance, DesignMask, MASK_FILTER};
pub use rect::{ImageDimensions, Rect};
pub use source::{HttpImageLoader, ImageLoader, ImageLoaderConfig, ImageSource};

#[cfg(test)]
pub use source::MockImageLoader;
