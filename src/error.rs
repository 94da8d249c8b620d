//! Error types for the color-to-alpha crate.

/// Broad classification of an [`Error`].
///
/// Every error is a rejected input; retrying with the same input cannot succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transform parameters are invalid (thresholds, color, mode tokens).
    Config,
    /// The image itself cannot be processed (channel layout, size).
    InputFormat,
    /// Reading, decoding, encoding or writing a file failed.
    Io,
}

/// Errors that can occur while configuring or running the transform.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transparency threshold is above the opacity threshold.
    #[error(
        "transparency threshold ({transparency}) must not exceed opacity threshold ({opacity})"
    )]
    InvertedThresholds {
        /// Requested transparency threshold.
        transparency: f32,
        /// Requested opacity threshold.
        opacity: f32,
    },

    /// A threshold is negative, infinite or not a number.
    #[error("{name} threshold {value} must be a finite, non-negative distance")]
    InvalidThreshold {
        /// Which threshold was rejected (`transparency` or `opacity`).
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A threshold is above the largest distance accepted for the shape.
    #[error("{name} threshold {value} is outside [0, {limit}] for shape {shape}")]
    ThresholdOutOfRange {
        /// Which threshold was rejected (`transparency` or `opacity`).
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Largest accepted value for the shape.
        limit: f32,
        /// Shape token the limit belongs to.
        shape: &'static str,
    },

    /// A color string could not be parsed.
    #[error("invalid color {0:?}: expected #RRGGBB or #RGB")]
    InvalidColor(String),

    /// Unknown shape token.
    #[error("unknown shape {0:?}: expected sphere or cube")]
    UnknownShape(String),

    /// Unknown interpolation token.
    #[error("unknown interpolation {0:?}: expected linear, power, root, smooth or inverse-sin")]
    UnknownInterpolation(String),

    /// The image does not carry 3 (RGB) or 4 (RGBA) channels.
    #[error("unsupported channel count {0}: expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels(u8),

    /// The image has 3 or 4 channels but not 8 bits per channel.
    #[error("unsupported pixel layout {0}: expected 8-bit RGB or RGBA")]
    UnsupportedColorType(String),

    /// The image has zero width or zero height.
    #[error("image has no pixels")]
    EmptyImage,

    /// A raw pixel buffer does not match its declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        /// `width * height * channels`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvertedThresholds { .. }
            | Self::InvalidThreshold { .. }
            | Self::ThresholdOutOfRange { .. }
            | Self::InvalidColor(_)
            | Self::UnknownShape(_)
            | Self::UnknownInterpolation(_) => ErrorKind::Config,
            Self::UnsupportedChannels(_)
            | Self::UnsupportedColorType(_)
            | Self::EmptyImage
            | Self::BufferSizeMismatch { .. } => ErrorKind::InputFormat,
            Self::Io(_) | Self::UnsupportedFormat(_) | Self::Image(_) => ErrorKind::Io,
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
