//! Alpha shaping: from a color distance to an opacity in `[0, 1]`.
//!
//! Distances at or below the transparency threshold become fully transparent,
//! distances at or above the opacity threshold stay fully opaque, and the band
//! in between is eased by an [`Interpolation`] function:
//!
//! ```text
//! t     = clamp((d - tt) / (ot - tt), 0, 1)
//! alpha = f(t)
//! ```
//!
//! Every easing function is non-decreasing on `[0, 1]` with `f(0) = 0` and
//! `f(1) = 1`.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::distance::Shape;
use crate::error::{Error, Result};

/// Easing applied to the normalized position inside the threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Interpolation {
    /// `f(t) = t`
    #[default]
    Linear,
    /// `f(t) = t²`
    Power,
    /// `f(t) = √t`
    Root,
    /// `f(t) = 3t² − 2t³` (smoothstep)
    Smooth,
    /// `f(t) = (1 − cos(πt)) / 2`
    InverseSin,
}

/// A resolved easing function.
pub type EaseFn = fn(f32) -> f32;

impl Interpolation {
    /// All interpolation modes, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Linear,
        Self::Power,
        Self::Root,
        Self::Smooth,
        Self::InverseSin,
    ];

    /// Token used on the command line and in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Power => "power",
            Self::Root => "root",
            Self::Smooth => "smooth",
            Self::InverseSin => "inverse-sin",
        }
    }

    /// The easing function for this mode.
    #[must_use]
    pub fn easing(self) -> EaseFn {
        match self {
            Self::Linear => linear,
            Self::Power => power,
            Self::Root => root,
            Self::Smooth => smooth,
            Self::InverseSin => inverse_sin,
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == token)
            .ok_or_else(|| Error::UnknownInterpolation(s.to_string()))
    }
}

fn linear(t: f32) -> f32 {
    t
}

fn power(t: f32) -> f32 {
    t * t
}

fn root(t: f32) -> f32 {
    t.sqrt()
}

fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn inverse_sin(t: f32) -> f32 {
    (1.0 - (PI * t).cos()) / 2.0
}

/// Apply the easing of `mode` to a normalized position `t` in `[0, 1]`.
///
/// Inputs outside `[0, 1]` are clamped first.
#[must_use]
pub fn ease(t: f32, mode: Interpolation) -> f32 {
    ease_with(t, mode.easing())
}

fn ease_with(t: f32, f: EaseFn) -> f32 {
    // The endpoints are exact so that pixels outside the band are untouched.
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        f(t).clamp(0.0, 1.0)
    }
}

/// Validated transparency/opacity threshold pair.
///
/// Construction guarantees both values are finite, non-negative and ordered
/// (`transparency <= opacity`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    transparency: f32,
    opacity: f32,
}

impl Thresholds {
    /// Validate a threshold pair without a shape-specific upper bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`] for negative or non-finite values,
    /// [`Error::InvertedThresholds`] when `transparency > opacity`.
    pub fn new(transparency: f32, opacity: f32) -> Result<Self> {
        Self::checked(transparency, opacity, None)
    }

    /// Validate a threshold pair against the range of `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`] for negative or non-finite values,
    /// [`Error::ThresholdOutOfRange`] above `shape.threshold_limit()`,
    /// [`Error::InvertedThresholds`] when `transparency > opacity`.
    pub fn for_shape(transparency: f32, opacity: f32, shape: Shape) -> Result<Self> {
        Self::checked(transparency, opacity, Some(shape))
    }

    fn checked(transparency: f32, opacity: f32, shape: Option<Shape>) -> Result<Self> {
        for (name, value) in [("transparency", transparency), ("opacity", opacity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidThreshold { name, value });
            }
            if let Some(shape) = shape {
                let limit = shape.threshold_limit();
                if value > limit {
                    return Err(Error::ThresholdOutOfRange {
                        name,
                        value,
                        limit,
                        shape: shape.as_str(),
                    });
                }
            }
        }
        if transparency > opacity {
            return Err(Error::InvertedThresholds {
                transparency,
                opacity,
            });
        }
        Ok(Self {
            transparency,
            opacity,
        })
    }

    /// Distance at or below which pixels become fully transparent.
    #[must_use]
    pub fn transparency(self) -> f32 {
        self.transparency
    }

    /// Distance at or above which pixels stay fully opaque.
    #[must_use]
    pub fn opacity(self) -> f32 {
        self.opacity
    }

    /// Position of `d` inside the band, clamped to `[0, 1]`.
    ///
    /// A zero-width band is a step: `0` below the threshold, `1` from it on.
    #[must_use]
    pub fn normalize(self, d: f32) -> f32 {
        let width = self.opacity - self.transparency;
        if width <= 0.0 {
            return if d < self.transparency { 0.0 } else { 1.0 };
        }
        ((d - self.transparency) / width).clamp(0.0, 1.0)
    }

    pub(crate) fn alpha_with(self, d: f32, f: EaseFn) -> f32 {
        ease_with(self.normalize(d), f)
    }
}

/// Opacity in `[0, 1]` for a pixel `d` away from the target color.
#[must_use]
pub fn alpha(d: f32, thresholds: Thresholds, mode: Interpolation) -> f32 {
    thresholds.alpha_with(d, mode.easing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn band(tt: f32, ot: f32) -> Thresholds {
        Thresholds::new(tt, ot).unwrap()
    }

    #[test]
    fn easing_endpoints_are_exact() {
        for mode in Interpolation::ALL {
            assert!(ease(0.0, mode).abs() < f32::EPSILON, "{mode}");
            assert!((ease(1.0, mode) - 1.0).abs() < f32::EPSILON, "{mode}");
        }
    }

    #[test]
    fn easing_midpoints_match_formulas() {
        assert!((ease(0.5, Interpolation::Linear) - 0.5).abs() < 1e-6);
        assert!((ease(0.5, Interpolation::Power) - 0.25).abs() < 1e-6);
        assert!((ease(0.25, Interpolation::Root) - 0.5).abs() < 1e-6);
        assert!((ease(0.5, Interpolation::Smooth) - 0.5).abs() < 1e-6);
        assert!((ease(0.25, Interpolation::Smooth) - 0.156_25).abs() < 1e-6);
        assert!((ease(0.5, Interpolation::InverseSin) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn step_when_thresholds_are_equal() {
        let t = band(50.0, 50.0);
        for mode in Interpolation::ALL {
            assert!(alpha(49.9, t, mode).abs() < f32::EPSILON);
            assert!((alpha(50.0, t, mode) - 1.0).abs() < f32::EPSILON);
            assert!((alpha(300.0, t, mode) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn outside_band_is_fully_transparent_or_opaque() {
        let t = band(18.0, 193.0);
        for mode in Interpolation::ALL {
            assert!(alpha(0.0, t, mode).abs() < f32::EPSILON);
            assert!(alpha(18.0, t, mode).abs() < f32::EPSILON);
            assert!((alpha(193.0, t, mode) - 1.0).abs() < f32::EPSILON);
            assert!((alpha(255.0, t, mode) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn linear_band_position() {
        let a = alpha(55.0, band(18.0, 193.0), Interpolation::Linear);
        assert!((a - 37.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = Thresholds::new(200.0, 100.0).unwrap_err();
        assert!(matches!(err, Error::InvertedThresholds { .. }));
    }

    #[test]
    fn rejects_negative_and_non_finite_thresholds() {
        assert!(matches!(
            Thresholds::new(-1.0, 10.0),
            Err(Error::InvalidThreshold {
                name: "transparency",
                ..
            })
        ));
        assert!(matches!(
            Thresholds::new(0.0, f32::NAN),
            Err(Error::InvalidThreshold { name: "opacity", .. })
        ));
        assert!(matches!(
            Thresholds::for_shape(0.0, f32::INFINITY, Shape::Sphere),
            Err(Error::InvalidThreshold { name: "opacity", .. })
        ));

        let msg = Thresholds::new(-1.0, 10.0).unwrap_err().to_string();
        assert!(!msg.contains("inf"), "{msg}");
        assert!(!msg.contains("shape"), "{msg}");
    }

    #[test]
    fn rejects_thresholds_above_shape_limit() {
        assert!(matches!(
            Thresholds::for_shape(18.0, 300.0, Shape::Cube),
            Err(Error::ThresholdOutOfRange {
                shape: "cube",
                limit,
                ..
            }) if (limit - 255.0).abs() < f32::EPSILON
        ));
        assert!(Thresholds::for_shape(18.0, 300.0, Shape::Sphere).is_ok());
        assert!(Thresholds::for_shape(0.0, 442.0, Shape::Sphere).is_ok());
        assert!(Thresholds::for_shape(0.0, 442.5, Shape::Sphere).is_err());
        assert!(Thresholds::new(0.0, 10_000.0).is_ok());
    }

    #[test]
    fn interpolation_tokens_round_trip() {
        for mode in Interpolation::ALL {
            assert_eq!(mode.as_str().parse::<Interpolation>().unwrap(), mode);
        }
        assert_eq!(
            "inverse_sin".parse::<Interpolation>().unwrap(),
            Interpolation::InverseSin
        );
        assert!(matches!(
            "cubic".parse::<Interpolation>(),
            Err(Error::UnknownInterpolation(_))
        ));
    }

    proptest! {
        #[test]
        fn alpha_is_monotonic_in_distance(
            tt in 0.0f32..200.0,
            width in 0.0f32..240.0,
            d1 in 0.0f32..442.0,
            d2 in 0.0f32..442.0,
        ) {
            let t = band(tt, tt + width);
            let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            for mode in Interpolation::ALL {
                let a_lo = alpha(lo, t, mode);
                let a_hi = alpha(hi, t, mode);
                prop_assert!((0.0..=1.0).contains(&a_lo));
                prop_assert!(a_lo <= a_hi + 1e-6, "{mode}: alpha({lo})={a_lo} > alpha({hi})={a_hi}");
            }
        }

        #[test]
        fn easing_stays_in_unit_interval(t in -1.0f32..2.0) {
            for mode in Interpolation::ALL {
                prop_assert!((0.0..=1.0).contains(&ease(t, mode)));
            }
        }
    }
}
