//! The color-to-alpha kernel: distance, alpha shaping and color recovery
//! applied to every pixel of an image.
//!
//! Options are validated and resolved once into a [`ColorToAlpha`] whose
//! distance and easing functions are plain function pointers, so the pixel
//! loop never inspects a mode. Each output row is written by exactly one task
//! and only reads the matching input row.

use image::{DynamicImage, ImageBuffer, RgbaImage};
use log::debug;

use crate::color::Color;
use crate::curve::{EaseFn, Interpolation, Thresholds};
use crate::distance::{DistanceFn, Shape};
use crate::error::{Error, Result};
use crate::recovery;

/// Default transparency threshold.
pub const DEFAULT_TRANSPARENCY_THRESHOLD: f32 = 18.0;
/// Default opacity threshold.
pub const DEFAULT_OPACITY_THRESHOLD: f32 = 193.0;

/// Parameters of a color-to-alpha transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Color turned into transparency.
    pub target: Color,
    /// Distance at or below which pixels become fully transparent.
    pub transparency_threshold: f32,
    /// Distance at or above which pixels stay fully opaque.
    pub opacity_threshold: f32,
    /// Distance geometry.
    pub shape: Shape,
    /// Easing across the threshold band.
    pub interpolation: Interpolation,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            target: Color::WHITE,
            transparency_threshold: DEFAULT_TRANSPARENCY_THRESHOLD,
            opacity_threshold: DEFAULT_OPACITY_THRESHOLD,
            shape: Shape::default(),
            interpolation: Interpolation::default(),
        }
    }
}

impl TransformOptions {
    /// Check the thresholds against the chosen shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`], [`Error::ThresholdOutOfRange`] or
    /// [`Error::InvertedThresholds`].
    pub fn validate(&self) -> Result<Thresholds> {
        Thresholds::for_shape(
            self.transparency_threshold,
            self.opacity_threshold,
            self.shape,
        )
    }

    /// Validate and resolve into a ready-to-run kernel.
    ///
    /// # Errors
    ///
    /// See [`TransformOptions::validate`].
    pub fn resolve(&self) -> Result<ColorToAlpha> {
        ColorToAlpha::new(self)
    }
}

/// A validated transform with its distance and easing functions selected.
#[derive(Debug, Clone, Copy)]
pub struct ColorToAlpha {
    target: Color,
    thresholds: Thresholds,
    shape: Shape,
    interpolation: Interpolation,
    metric: DistanceFn,
    easing: EaseFn,
}

impl ColorToAlpha {
    /// Resolve `opts` into a kernel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`], [`Error::ThresholdOutOfRange`] or
    /// [`Error::InvertedThresholds`] when the thresholds do not fit the shape.
    pub fn new(opts: &TransformOptions) -> Result<Self> {
        let thresholds = opts.validate()?;
        debug!(
            "color-to-alpha kernel: target={} shape={} interpolation={} thresholds=[{}, {}]",
            opts.target,
            opts.shape,
            opts.interpolation,
            thresholds.transparency(),
            thresholds.opacity()
        );
        Ok(Self {
            target: opts.target,
            thresholds,
            shape: opts.shape,
            interpolation: opts.interpolation,
            metric: opts.shape.metric(),
            easing: opts.interpolation.easing(),
        })
    }

    /// Target color of this kernel.
    #[must_use]
    pub fn target(&self) -> Color {
        self.target
    }

    /// Validated thresholds of this kernel.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Distance geometry of this kernel.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Easing of this kernel.
    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Normalized alpha for a single color, before source alpha is applied.
    #[must_use]
    pub fn alpha_of(&self, color: Color) -> f32 {
        let d = (self.metric)(color, self.target);
        self.thresholds.alpha_with(d, self.easing)
    }

    /// Transform one pixel. A missing source alpha counts as opaque.
    #[must_use]
    pub fn apply(&self, color: Color, source_alpha: Option<u8>) -> [u8; 4] {
        let (recovered, alpha8) = recovery::recover(color, self.target, self.alpha_of(color));
        let alpha = recovery::combine_alpha(source_alpha.unwrap_or(u8::MAX), alpha8);
        [recovered.r, recovered.g, recovered.b, alpha]
    }

    fn process_row(&self, input: &[u8], output: &mut [u8], channels: usize) {
        for (src, dst) in input.chunks_exact(channels).zip(output.chunks_exact_mut(4)) {
            let color = Color::new(src[0], src[1], src[2]);
            let source_alpha = src.get(3).copied();
            dst.copy_from_slice(&self.apply(color, source_alpha));
        }
    }

    /// Transform a raw, row-major 8-bit buffer with 3 (RGB) or 4 (RGBA) channels.
    ///
    /// The input is only read; a new RGBA image of the same size is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for channel counts other than
    /// 3 or 4, [`Error::EmptyImage`] for zero-sized images and
    /// [`Error::BufferSizeMismatch`] when `data` does not match the dimensions.
    pub fn transform_raw(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<RgbaImage> {
        if !matches!(channels, 3 | 4) {
            return Err(Error::UnsupportedChannels(channels));
        }
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage);
        }

        let channels = usize::from(channels);
        let (w, h) = (width as usize, height as usize);
        let expected = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(Error::BufferSizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        debug!(
            "color-to-alpha: {width}x{height}, {channels} channels, target {}",
            self.target
        );

        let in_stride = w * channels;
        let out_stride = w * 4;
        let mut out = vec![0u8; w * h * 4];

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            out.par_chunks_mut(out_stride)
                .zip(data.par_chunks(in_stride))
                .for_each(|(dst, src)| self.process_row(src, dst, channels));
        }

        #[cfg(not(feature = "parallel"))]
        {
            out.chunks_mut(out_stride)
                .zip(data.chunks(in_stride))
                .for_each(|(dst, src)| self.process_row(src, dst, channels));
        }

        let len = out.len();
        RgbaImage::from_raw(width, height, out).ok_or(Error::BufferSizeMismatch {
            expected: len,
            actual: len,
        })
    }

    /// Transform an 8-bit image buffer of any pixel type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] unless the pixel type has 3 or 4
    /// channels, [`Error::EmptyImage`] for zero-sized images.
    pub fn transform_buffer<P>(&self, image: &ImageBuffer<P, Vec<u8>>) -> Result<RgbaImage>
    where
        P: image::Pixel<Subpixel = u8>,
    {
        self.transform_raw(image.as_raw(), image.width(), image.height(), P::CHANNEL_COUNT)
    }

    /// Transform a decoded image.
    ///
    /// Only 8-bit RGB and RGBA layouts are accepted; convert other layouts
    /// (for example with [`DynamicImage::to_rgba8`]) first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for layouts that are not 3 or 4
    /// channels, [`Error::UnsupportedColorType`] for 3/4-channel layouts that
    /// are not 8 bits per channel, [`Error::EmptyImage`] for zero-sized images.
    pub fn transform(&self, image: &DynamicImage) -> Result<RgbaImage> {
        match image {
            DynamicImage::ImageRgb8(buf) => self.transform_buffer(buf),
            DynamicImage::ImageRgba8(buf) => self.transform_buffer(buf),
            other => {
                let color = other.color();
                match color.channel_count() {
                    3 | 4 => Err(Error::UnsupportedColorType(format!("{color:?}"))),
                    n => Err(Error::UnsupportedChannels(n)),
                }
            }
        }
    }
}

/// Validate `opts` and transform a decoded image.
///
/// # Errors
///
/// Any configuration error from [`TransformOptions::validate`], or an input
/// format error from [`ColorToAlpha::transform`].
pub fn transform(image: &DynamicImage, opts: &TransformOptions) -> Result<RgbaImage> {
    opts.resolve()?.transform(image)
}

/// Validate `opts` and transform a raw 8-bit RGB or RGBA buffer.
///
/// # Errors
///
/// Any configuration error from [`TransformOptions::validate`], or an input
/// format error from [`ColorToAlpha::transform_raw`].
pub fn transform_raw(
    data: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    opts: &TransformOptions,
) -> Result<RgbaImage> {
    opts.resolve()?.transform_raw(data, width, height, channels)
}
