//! Rectangle geometry for pasting and outlining.
//!
//! A [`Rect`] is half-open: it covers columns `left..left + width` and rows
//! `top..top + height`. Regions that extend past the image are clipped, never
//! rejected.
//!
//! # Example
//!
//! ```ignore
//! use mockup::imaging::{ImageDimensions, Rect};
//!
//! let rect = Rect::new(700, 900, 200, 200);
//! let image = ImageDimensions { width: 800, height: 1000 };
//! assert_eq!(rect.clip(&image), Some(Rect::new(700, 900, 100, 100)));
//! ```

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn of(image: &image::DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Axis-aligned pixel region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.left as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.top as u64 + self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with the image bounds.
    ///
    /// Returns `None` when nothing of the rectangle is visible.
    pub fn clip(&self, image: &ImageDimensions) -> Option<Rect> {
        if self.is_empty() || self.left >= image.width || self.top >= image.height {
            return None;
        }

        let right = self.right().min(image.width as u64) as u32;
        let bottom = self.bottom().min(image.height as u64) as u32;

        Some(Rect::new(
            self.left,
            self.top,
            right - self.left,
            bottom - self.top,
        ))
    }
}
