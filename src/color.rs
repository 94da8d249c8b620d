//! The 8-bit RGB [`Color`] value type and its hex notation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure white, the default target color.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for any other input.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let nibble = |c: u8| char::from(c).to_digit(16).and_then(|v| u8::try_from(v).ok());

        let bytes = digits.as_bytes();
        match bytes.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, &c) in out.iter_mut().zip(bytes) {
                    *slot = nibble(c).ok_or_else(invalid)? * 17;
                }
                Ok(Self::from(out))
            }
            6 => {
                let mut out = [0u8; 3];
                for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                    let hi = nibble(pair[0]).ok_or_else(invalid)?;
                    let lo = nibble(pair[1]).ok_or_else(invalid)?;
                    *slot = (hi << 4) | lo;
                }
                Ok(Self::from(out))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as uppercase `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        c.channels()
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(px: image::Rgb<u8>) -> Self {
        Self::from(px.0)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::from_hex("#10EAEC").unwrap(), Color::new(0x10, 0xEA, 0xEC));
        assert_eq!(Color::from_hex("10eaec").unwrap(), Color::new(0x10, 0xEA, 0xEC));
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#a0c").unwrap(), Color::new(0xAA, 0x00, 0xCC));
        assert_eq!(" #000000 ".parse::<Color>().unwrap(), Color::BLACK);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "#12345", "#1234567", "#GGGGGG", "#ééé", "white"] {
            let err = Color::from_hex(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidColor(_)), "{bad:?} -> {err}");
        }
    }

    #[test]
    fn formats_uppercase_hex() {
        assert_eq!(Color::new(16, 234, 236).to_hex(), "#10EAEC");
        assert_eq!(Color::WHITE.to_string(), "#FFFFFF");
        let c = Color::new(1, 2, 3);
        assert_eq!(c.to_hex().parse::<Color>().unwrap(), c);
    }
}
