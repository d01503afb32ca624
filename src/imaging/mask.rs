//! Luminance mask derived from a design image.
//!
//! The design is reduced to 8-bit luminance, resized to the position and
//! inverted. The inverted luminance is the alpha mask: dark ink becomes
//! opaque and a white background becomes transparent.
//!
//! Luminance uses the ITU-R 601-2 weights in 16.16 fixed point
//! (`(19595 R + 38470 G + 7471 B + 0x8000) >> 16`). Any alpha channel on the
//! design is ignored. Resampling is bilinear (`FilterType::Triangle`), which
//! is deterministic for a given input and target size.

use super::ImagingError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

/// Resampling filter used when fitting a design to a position.
pub const MASK_FILTER: FilterType = FilterType::Triangle;

/// Resized design luminance and the alpha mask derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignMask {
    /// Grayscale design at target size.
    pub luma: GrayImage,
    /// Per-pixel opacity: `255 - luma`.
    pub alpha: GrayImage,
}

impl DesignMask {
    /// Pixels to paste: the design luminance, or its photometric inverse
    /// when the template is a negative.
    pub fn payload(&self, negative: bool) -> &GrayImage {
        if negative {
            &self.alpha
        } else {
            &self.luma
        }
    }

    pub fn width(&self) -> u32 {
        self.luma.width()
    }

    pub fn height(&self) -> u32 {
        self.luma.height()
    }
}

/// Build the mask for `design` at `width` x `height`.
///
/// # Errors
///
/// Returns `ImagingError::Geometry` if either dimension is zero.
pub fn build_mask(
    design: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<DesignMask, ImagingError> {
    if width == 0 || height == 0 {
        return Err(ImagingError::Geometry(format!(
            "mask size must be non-zero, got {}x{}",
            width, height
        )));
    }

    let gray = to_luminance(design);
    let luma = if gray.dimensions() == (width, height) {
        gray
    } else {
        imageops::resize(&gray, width, height, MASK_FILTER)
    };

    let alpha = invert(&luma);
    Ok(DesignMask { luma, alpha })
}

/// Convert any image to 8-bit luminance, ignoring alpha.
pub fn to_luminance(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        let l = (19595 * p[0] as u32 + 38470 * p[1] as u32 + 7471 * p[2] as u32 + 0x8000) >> 16;
        Luma([l.min(255) as u8])
    })
}

/// Photometric inverse of an 8-bit grayscale image.
pub fn invert(image: &GrayImage) -> GrayImage {
    let mut inverted = image.clone();
    for pixel in inverted.pixels_mut() {
        pixel[0] = 255 - pixel[0];
    }
    inverted
}
