//! sRGB color type

use serde::{Serialize, Deserialize};

/// An sRGB color with alpha, each component in 0.0-1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// White
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Black
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Mid gray
    pub const GRAY: Self = Self { r: 0.5, g: 0.5, b: 0.5, a: 1.0 };

    /// Create a color from RGBA components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create an opaque color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Convert to linear RGB (alpha unchanged)
    pub fn to_linear(&self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    /// Component-wise sum of the RGB channels, alpha kept at the max of both
    pub fn add_rgb(&self, other: &Self) -> Self {
        Self::rgba(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a.max(other.a),
        )
    }

    /// Components as an RGBA array
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_from_hex_dim_ambient() {
        let c = Color::from_hex(0x030303);
        assert!((c.r - 3.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn test_to_linear_endpoints() {
        let black = Color::BLACK.to_linear();
        let white = Color::WHITE.to_linear();
        assert_eq!(black.r, 0.0);
        assert!((white.r - 1.0).abs() < 1e-6);
        // Mid gray is darker in linear space
        assert!(Color::GRAY.to_linear().r < 0.25);
    }

    #[test]
    fn test_add_rgb() {
        let sum = Color::rgb(0.1, 0.2, 0.3).add_rgb(&Color::rgba(0.1, 0.1, 0.1, 0.5));
        assert!((sum.r - 0.2).abs() < 1e-6);
        assert!((sum.b - 0.4).abs() < 1e-6);
        assert_eq!(sum.a, 1.0);
    }
}
