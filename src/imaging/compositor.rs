//! Compositor for pasting designs and outlining positions on templates.
//!
//! Both operations take the template by reference and return a fresh image;
//! the caller's template is never modified.
//!
//! # Paste
//!
//! The payload (a grayscale design) is composited through a same-sized alpha
//! mask with a straight alpha composite:
//!
//! ```text
//! out = (payload * a + template * (255 - a)) / 255
//! ```
//!
//! A mask value of 0 leaves the template pixel untouched, 255 replaces it.
//! Whatever part of the region falls outside the template is discarded.
//!
//! # Outline
//!
//! The position is filled with a semi-transparent highlight and framed with
//! an opaque border drawn inside the region edges.

use super::rect::{ImageDimensions, Rect};
use image::{ColorType, DynamicImage, GrayAlphaImage, GrayImage, Luma, LumaA, Rgba, RgbaImage};

use crate::constants::{
    OUTLINE_BORDER_ALPHA, OUTLINE_BORDER_WIDTH, OUTLINE_COLOR, OUTLINE_FILL_ALPHA,
};

/// Colours and border width used by [`outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineStyle {
    pub fill: Rgba<u8>,
    pub border: Rgba<u8>,
    pub border_width: u32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        let [r, g, b] = OUTLINE_COLOR;
        Self {
            fill: Rgba([r, g, b, OUTLINE_FILL_ALPHA]),
            border: Rgba([r, g, b, OUTLINE_BORDER_ALPHA]),
            border_width: OUTLINE_BORDER_WIDTH,
        }
    }
}

/// Paste `payload` onto a copy of `template` at `rect`, weighted by `alpha`.
///
/// `payload` and `alpha` are expected at the rect's size; anything beyond
/// either the rect, the payload, or the template bounds is ignored. The
/// result keeps the template's dimensions and (8-bit) colour type.
pub fn paste(
    template: &DynamicImage,
    rect: Rect,
    payload: &GrayImage,
    alpha: &GrayImage,
) -> DynamicImage {
    let mut target = template.to_rgba8();

    let region = Rect::new(
        rect.left,
        rect.top,
        rect.width.min(payload.width()).min(alpha.width()),
        rect.height.min(payload.height()).min(alpha.height()),
    );

    if let Some(visible) = region.clip(&ImageDimensions::of(template)) {
        for ty in visible.top..visible.top + visible.height {
            for tx in visible.left..visible.left + visible.width {
                let sx = tx - rect.left;
                let sy = ty - rect.top;

                let value = payload.get_pixel(sx, sy)[0];
                let a = alpha.get_pixel(sx, sy)[0];
                if a == 0 {
                    continue;
                }

                let background = *target.get_pixel(tx, ty);
                target.put_pixel(tx, ty, mask_composite(background, value, a));
            }
        }
    }

    restore_color(template.color(), target)
}

/// Draw the outline of `rect` onto a copy of `template`.
///
/// The result is RGB, or RGBA when the template has an alpha channel, so the
/// highlight colour survives grayscale templates.
pub fn outline(template: &DynamicImage, rect: Rect, style: &OutlineStyle) -> DynamicImage {
    let mut target = template.to_rgba8();

    if let Some(visible) = rect.clip(&ImageDimensions::of(template)) {
        let bw = style.border_width as u64;
        let inner_left = rect.left as u64 + bw;
        let inner_top = rect.top as u64 + bw;
        let inner_right = rect.right().saturating_sub(bw);
        let inner_bottom = rect.bottom().saturating_sub(bw);

        for ty in visible.top..visible.top + visible.height {
            for tx in visible.left..visible.left + visible.width {
                let (x, y) = (tx as u64, ty as u64);
                let on_border =
                    x < inner_left || x >= inner_right || y < inner_top || y >= inner_bottom;

                let background = *target.get_pixel(tx, ty);
                let filled = blend_pixels(background, style.fill, 1.0);
                let pixel = if on_border {
                    blend_pixels(filled, style.border, 1.0)
                } else {
                    filled
                };
                target.put_pixel(tx, ty, pixel);
            }
        }
    }

    if template.color().has_alpha() {
        DynamicImage::ImageRgba8(target)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(target).to_rgb8())
    }
}

/// Straight alpha composite of a gray value over `background`.
///
/// The payload is opaque, so the output alpha moves towards 255 by `a`.
fn mask_composite(background: Rgba<u8>, value: u8, a: u8) -> Rgba<u8> {
    let a = a as u32;
    let mix = |fg: u8, bg: u8| -> u8 {
        ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
    };

    Rgba([
        mix(value, background[0]),
        mix(value, background[1]),
        mix(value, background[2]),
        mix(255, background[3]),
    ])
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    // Porter-Duff "over" operator
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Convert the working RGBA buffer back to the template's colour layout.
///
/// Gray templates only ever receive gray payloads, so their channels stay
/// equal and the red channel is the luminance.
fn restore_color(original: ColorType, rgba: RgbaImage) -> DynamicImage {
    match original {
        ColorType::L8 => DynamicImage::ImageLuma8(GrayImage::from_fn(
            rgba.width(),
            rgba.height(),
            |x, y| Luma([rgba.get_pixel(x, y)[0]]),
        )),
        ColorType::La8 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(
            rgba.width(),
            rgba.height(),
            |x, y| {
                let p = rgba.get_pixel(x, y);
                LumaA([p[0], p[3]])
            },
        )),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    }
}
