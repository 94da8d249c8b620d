//! Distance between a pixel and the target color in RGB space.
//!
//! Two geometries are supported:
//! - **Cube** (Chebyshev norm): the largest single-channel difference, `[0, 255]`.
//! - **Sphere** (Euclidean norm): the straight-line distance, `[0, 255√3]`.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::{Error, Result};

/// Largest possible sphere distance, `255 * sqrt(3)` rounded up.
pub const SPHERE_MAX_DISTANCE: f32 = 441.673;

/// Largest possible cube distance.
pub const CUBE_MAX_DISTANCE: f32 = 255.0;

/// Distance geometry used to compare a pixel with the target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Shape {
    /// Euclidean distance: a ball-shaped isosurface around the target.
    #[default]
    Sphere,
    /// Chebyshev distance: a box-shaped isosurface around the target.
    Cube,
}

/// A resolved distance function.
pub type DistanceFn = fn(Color, Color) -> f32;

impl Shape {
    /// Token used on the command line and in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
        }
    }

    /// Largest distance two 8-bit colors can be apart under this shape.
    #[must_use]
    pub const fn max_distance(self) -> f32 {
        match self {
            Self::Sphere => SPHERE_MAX_DISTANCE,
            Self::Cube => CUBE_MAX_DISTANCE,
        }
    }

    /// Largest threshold accepted for this shape.
    ///
    /// The sphere limit is the integer slider bound `ceil(255 * sqrt(3)) = 442`.
    #[must_use]
    pub const fn threshold_limit(self) -> f32 {
        match self {
            Self::Sphere => 442.0,
            Self::Cube => CUBE_MAX_DISTANCE,
        }
    }

    /// The distance function for this shape.
    #[must_use]
    pub fn metric(self) -> DistanceFn {
        match self {
            Self::Sphere => sphere_distance,
            Self::Cube => cube_distance,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sphere" => Ok(Self::Sphere),
            "cube" => Ok(Self::Cube),
            _ => Err(Error::UnknownShape(s.to_string())),
        }
    }
}

fn channel_deltas(a: Color, b: Color) -> [f32; 3] {
    [
        f32::from(a.r.abs_diff(b.r)),
        f32::from(a.g.abs_diff(b.g)),
        f32::from(a.b.abs_diff(b.b)),
    ]
}

/// Euclidean distance between two colors.
#[must_use]
pub fn sphere_distance(a: Color, b: Color) -> f32 {
    let [dr, dg, db] = channel_deltas(a, b);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Chebyshev distance between two colors.
#[must_use]
pub fn cube_distance(a: Color, b: Color) -> f32 {
    let [dr, dg, db] = channel_deltas(a, b);
    dr.max(dg).max(db)
}

/// Distance between `pixel` and `target` under `shape`.
#[must_use]
pub fn distance(pixel: Color, target: Color, shape: Shape) -> f32 {
    shape.metric()(pixel, target)
}
