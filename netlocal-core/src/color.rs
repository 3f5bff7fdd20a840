//! RGBA color type and color-spec parsing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color with floating point components in `[0, 1]`
///
/// Serialized as a color spec string (`"#RRGGBBAA"`), parsed from hex or
/// from a name in [`NAMED_COLORS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Named colors understood by [`Rgba::from_str`]
pub const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("white", Rgba::WHITE),
    ("black", Rgba::BLACK),
    ("grey", Rgba::GREY),
    ("gray", Rgba::GREY),
    ("red", Rgba::rgb(1.0, 0.0, 0.0)),
    ("green", Rgba::rgb(0.0, 0.5, 0.0)),
    ("blue", Rgba::rgb(0.0, 0.0, 1.0)),
    ("yellow", Rgba::rgb(1.0, 1.0, 0.0)),
    ("cyan", Rgba::rgb(0.0, 1.0, 1.0)),
    ("magenta", Rgba::rgb(1.0, 0.0, 1.0)),
    ("orange", Rgba::rgb(1.0, 0.647_058_8, 0.0)),
    ("lightgrey", Rgba::rgb(0.827_451, 0.827_451, 0.827_451)),
    ("darkgrey", Rgba::rgb(0.662_745_1, 0.662_745_1, 0.662_745_1)),
    ("none", Rgba::TRANSPARENT),
];

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    /// Matplotlib's `grey` (`#808080`)
    pub const GREY: Rgba = Rgba::rgb(0.501_960_8, 0.501_960_8, 0.501_960_8);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from explicit RGBA components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit components
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidColor(format!("'{}' does not start with '#'", hex)))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(format!("'{}' is not a hex color", hex)));
        }

        let byte = |s: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|_| Error::InvalidColor(format!("'{}' is not a hex color", hex)))
        };

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (channel, c) in channels.iter_mut().zip(digits.chars()) {
                    let v = byte(&c.to_string())?;
                    *channel = v * 17;
                }
                Ok(Self::from_rgba8(channels[0], channels[1], channels[2], 255))
            }
            6 => Ok(Self::from_rgba8(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                255,
            )),
            8 => Ok(Self::from_rgba8(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            n => Err(Error::InvalidColor(format!(
                "'{}' has {} hex digits, expected 3, 6 or 8",
                hex, n
            ))),
        }
    }

    /// Return a copy with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Quantize to 8-bit RGBA
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Whether the color draws anything at all
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    /// Format as `#RRGGBBAA`
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        if spec.starts_with('#') {
            return Self::from_hex(spec);
        }
        let lower = spec.to_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(|| Error::InvalidColor(format!("unknown color name '{}'", spec)))
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl From<[f32; 4]> for Rgba {
    fn from(c: [f32; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_hex() {
        let c: Rgba = "#11205E".parse().unwrap();
        assert_eq!(c.to_rgba8(), [0x11, 0x20, 0x5E, 0xFF]);

        let short: Rgba = "#fff".parse().unwrap();
        assert_eq!(short, Rgba::WHITE);

        let with_alpha: Rgba = "#FFFFFF00".parse().unwrap();
        assert_relative_eq!(with_alpha.a, 0.0);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("white".parse::<Rgba>().unwrap(), Rgba::WHITE);
        assert_eq!("Grey".parse::<Rgba>().unwrap(), Rgba::GREY);
        assert_eq!("gray".parse::<Rgba>().unwrap().to_rgba8(), [128, 128, 128, 255]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#GGGGGG".parse::<Rgba>().is_err());
        assert!("#+F+F+F".parse::<Rgba>().is_err());
        assert!("#+ff".parse::<Rgba>().is_err());
        assert!("chartreuse-ish".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_relative_eq!(mid.r, 0.5);
        assert_relative_eq!(mid.g, 0.5);
        assert_relative_eq!(mid.b, 0.5);
        assert_relative_eq!(mid.a, 1.0);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let c = Rgba::from_rgba8(0x80, 0x12, 0x1B, 0xFF);
        let s: String = c.into();
        assert_eq!(s, "#80121BFF");
        let back = Rgba::try_from(s).unwrap();
        assert_eq!(back.to_rgba8(), c.to_rgba8());
    }
}
