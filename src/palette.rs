//! Ranked color histogram of an image.
//!
//! Used to suggest a target color: the most frequent color of a scan or a
//! flat-background render is usually the matte to remove.

use std::collections::HashMap;

use image::{DynamicImage, ImageBuffer};

use crate::color::Color;

/// Count each distinct RGB color, most frequent first.
///
/// Alpha is ignored. Ties are broken by ascending color so the order is
/// deterministic.
#[must_use]
pub fn color_distribution<P>(image: &ImageBuffer<P, Vec<u8>>) -> Vec<(Color, usize)>
where
    P: image::Pixel<Subpixel = u8>,
{
    let mut counts: HashMap<Color, usize> = HashMap::new();
    for px in image.pixels() {
        *counts.entry(Color::from(px.to_rgb())).or_insert(0) += 1;
    }

    let mut ranked: Vec<(Color, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// The `n` most frequent colors of `image` with their pixel counts.
#[must_use]
pub fn top_colors(image: &DynamicImage, n: usize) -> Vec<(Color, usize)> {
    let mut ranked = match image {
        DynamicImage::ImageRgb8(buf) => color_distribution(buf),
        DynamicImage::ImageRgba8(buf) => color_distribution(buf),
        other => color_distribution(&other.to_rgb8()),
    };
    ranked.truncate(n);
    ranked
}

/// The most frequent color of `image`, or `None` if it has no pixels.
#[must_use]
pub fn dominant_color(image: &DynamicImage) -> Option<Color> {
    top_colors(image, 1).first().map(|&(color, _)| color)
}
