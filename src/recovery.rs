//! Color recovery by inverting the blend with the target color.
//!
//! Each observed pixel is modeled as a mix of an unknown foreground and the
//! target color:
//! `pixel = alpha * foreground + (1 - alpha) * target`
//!
//! Solving for the foreground gives
//! `foreground = (pixel - (1 - alpha) * target) / alpha`,
//! clamped to `[0, 255]` and rounded to 8 bits.

use crate::color::Color;

/// Convert a normalized alpha in `[0, 1]` to 8 bits.
#[must_use]
pub fn alpha_to_byte(alpha: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Recover the foreground color of `pixel` given its computed `alpha`.
///
/// Returns the recovered color and `round(alpha * 255)`. A fully transparent
/// pixel keeps its original color since the blend carries no information.
#[must_use]
pub fn recover(pixel: Color, target: Color, alpha: f32) -> (Color, u8) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return (pixel, 0);
    }

    let inv_alpha = 1.0 - alpha;
    let unmix = |observed: u8, matte: u8| -> u8 {
        let original = (f32::from(observed) - inv_alpha * f32::from(matte)) / alpha;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            original.clamp(0.0, 255.0).round() as u8
        }
    };

    let recovered = Color::new(
        unmix(pixel.r, target.r),
        unmix(pixel.g, target.g),
        unmix(pixel.b, target.b),
    );
    (recovered, alpha_to_byte(alpha))
}

/// Scale a computed 8-bit alpha by the pixel's source alpha.
///
/// `round(source / 255 * computed / 255 * 255)`, so existing transparency is
/// kept rather than overwritten.
#[must_use]
pub fn combine_alpha(source: u8, computed: u8) -> u8 {
    let scaled = f32::from(source) * f32::from(computed) / 255.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        scaled.round() as u8
    }
}
