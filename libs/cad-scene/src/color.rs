//! RGBA colors of scene leaves.

use config::constants::{DEFAULT_COLOR, DEFAULT_EDGE_COLOR, DEFAULT_FACE_COLOR};
use serde::{Deserialize, Serialize};

use crate::node::Kind;

/// A color with channels in `0.0..=1.0`.
///
/// # Example
///
/// ```rust
/// use cad_scene::Rgba;
///
/// let orange = Rgba::from_hex("#e8b024").unwrap();
/// assert_eq!(orange, Rgba::from_rgb8([232, 176, 36]));
/// assert_eq!(orange.with_alpha(0.5).a, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Creates an opaque color from 8 bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Looks up a color by CSS name (case insensitive) or hex string.
    pub fn named(name: &str) -> Option<Self> {
        let rgb = match name.to_ascii_lowercase().as_str() {
            "black" => [0, 0, 0],
            "white" => [255, 255, 255],
            "red" => [255, 0, 0],
            "green" => [0, 128, 0],
            "blue" => [0, 0, 255],
            "yellow" => [255, 255, 0],
            "orange" => [255, 165, 0],
            "gray" | "grey" => [128, 128, 128],
            "silver" => [192, 192, 192],
            "violet" => [238, 130, 238],
            "mediumorchid" => [186, 85, 211],
            _ => return Self::from_hex(name),
        };
        Some(Self::from_rgb8(rgb))
    }

    /// Same color with another alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Default color of a leaf kind. Solids use `solid_default`.
    pub fn for_kind(kind: Kind, solid_default: Rgba) -> Self {
        match kind {
            Kind::Vertex | Kind::Edge => Self::from_rgb8(DEFAULT_EDGE_COLOR),
            Kind::Face => Self::from_rgb8(DEFAULT_FACE_COLOR),
            Kind::Solid => solid_default,
        }
    }

    /// `#rrggbb` rendering, alpha dropped.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::from_rgb8(DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgba::from_hex("#BA55D3").unwrap();
        assert_eq!(c.to_hex(), "#ba55d3");
        assert_eq!(Rgba::named("MediumOrchid"), Some(c));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("zzzzzz"), None);
        assert_eq!(Rgba::named("no-such-color"), None);
    }

    #[test]
    fn test_kind_defaults() {
        let solid = Rgba::named("red").unwrap();
        assert_eq!(Rgba::for_kind(Kind::Solid, solid), solid);
        assert_eq!(Rgba::for_kind(Kind::Edge, solid), Rgba::from_rgb8(DEFAULT_EDGE_COLOR));
        assert_eq!(Rgba::for_kind(Kind::Vertex, solid), Rgba::for_kind(Kind::Edge, solid));
        assert_eq!(Rgba::for_kind(Kind::Face, solid), Rgba::from_rgb8(DEFAULT_FACE_COLOR));
    }

    #[test]
    fn test_default_is_opaque() {
        assert_eq!(Rgba::default().a, 1.0);
        assert_eq!(Rgba::default().to_hex(), "#e8b024");
    }
}
