//! Turn a chosen color into transparency while recovering the true color of
//! partially matching pixels.
//!
//! Every pixel is compared with a target color. Pixels close to it become
//! transparent, pixels far from it stay opaque, and pixels in between get a
//! partial alpha together with the foreground color that, blended over the
//! target, reproduces the original pixel. The result is a clean cutout rather
//! than a hard chroma-key mask.
//!
//! # Quick Start
//!
//! ```no_run
//! use color_to_alpha::{Color, Interpolation, Shape, TransformOptions};
//!
//! let img = image::open("scan.png").unwrap();
//! let opts = TransformOptions {
//!     target: Color::WHITE,
//!     transparency_threshold: 18.0,
//!     opacity_threshold: 193.0,
//!     shape: Shape::Sphere,
//!     interpolation: Interpolation::Smooth,
//! };
//! let cutout = color_to_alpha::transform(&img, &opts).expect("valid options");
//! cutout.save("cutout.png").unwrap();
//! ```
//!
//! # Reusing a kernel
//!
//! [`TransformOptions::resolve`] validates the thresholds once and selects the
//! distance and easing functions, so the returned [`ColorToAlpha`] can be
//! applied to many images or single pixels.
//!
//! ```
//! use color_to_alpha::{Color, Shape, TransformOptions};
//!
//! let kernel = TransformOptions { shape: Shape::Cube, ..TransformOptions::default() }
//!     .resolve()
//!     .unwrap();
//! assert_eq!(kernel.apply(Color::WHITE, None)[3], 0);
//! assert_eq!(kernel.apply(Color::BLACK, None), [0, 0, 0, 255]);
//! assert_eq!(kernel.apply(Color::new(200, 200, 200), None), [0, 0, 0, 54]);
//! ```

#![deny(missing_docs)]

pub mod color;
pub mod composite;
pub mod curve;
pub mod distance;
mod engine;
pub mod error;
mod kernel;
pub mod palette;
pub mod recovery;

pub use color::Color;
pub use curve::{alpha, ease, Interpolation, Thresholds};
pub use distance::{distance, Shape};
pub use engine::{
    default_output_path, is_supported_image, save_image, Engine, ProcessOptions, ProcessResult,
};
pub use error::{Error, ErrorKind, Result};
pub use kernel::{
    transform, transform_raw, ColorToAlpha, TransformOptions, DEFAULT_OPACITY_THRESHOLD,
    DEFAULT_TRANSPARENCY_THRESHOLD,
};
pub use recovery::recover;
