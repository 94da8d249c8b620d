//! Preview compositing of a color-to-alpha result over a solid background.
//!
//! Uses the standard "over" operator with an opaque background:
//! `out = (c * a + bg * (255 - a)) / 255`, rounded, alpha 255.

use image::{Rgba, RgbaImage};

use crate::color::Color;

/// Composite one RGBA pixel over an opaque `background`.
#[must_use]
pub fn over_pixel(px: Rgba<u8>, background: Color) -> Rgba<u8> {
    let a = u32::from(px[3]);
    let mix = |c: u8, bg: u8| -> u8 {
        let sum = u32::from(c) * a + u32::from(bg) * (255 - a);
        // sum / 255 never exceeds 255.
        #[allow(clippy::cast_possible_truncation)]
        {
            ((sum + 127) / 255) as u8
        }
    };
    Rgba([
        mix(px[0], background.r),
        mix(px[1], background.g),
        mix(px[2], background.b),
        u8::MAX,
    ])
}

/// Composite a whole RGBA image over an opaque `background`.
#[must_use]
pub fn over_background(image: &RgbaImage, background: Color) -> RgbaImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        *px = over_pixel(*px, background);
    }
    out
}
