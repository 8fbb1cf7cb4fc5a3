//! Light types

use serde::{Serialize, Deserialize};
use synthscene_math::Color;

/// A light source
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Light {
    /// Uniform, non-positional illumination added to the world background
    Ambient { color: Color },
    /// Parallel rays along the object's local -Z axis (a sun)
    Directional { color: Color, intensity: f32 },
    /// Omnidirectional light at the object's position
    Point { color: Color, intensity: f32 },
}

impl Light {
    /// Ambient light of the given color
    pub fn ambient(color: Color) -> Self {
        Light::Ambient { color }
    }

    /// Directional light with unit intensity
    pub fn directional(color: Color) -> Self {
        Light::Directional { color, intensity: 1.0 }
    }

    /// Point light with unit intensity
    pub fn point(color: Color) -> Self {
        Light::Point { color, intensity: 1.0 }
    }

    /// Replace the intensity; ambient lights have none and are returned unchanged
    pub fn with_intensity(self, value: f32) -> Self {
        match self {
            Light::Directional { color, .. } => Light::Directional { color, intensity: value },
            Light::Point { color, .. } => Light::Point { color, intensity: value },
            ambient => ambient,
        }
    }

    /// Color of the light
    pub fn color(&self) -> Color {
        match self {
            Light::Ambient { color }
            | Light::Directional { color, .. }
            | Light::Point { color, .. } => *color,
        }
    }

    /// Intensity, `None` for ambient lights
    pub fn intensity(&self) -> Option<f32> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional { intensity, .. } | Light::Point { intensity, .. } => Some(*intensity),
        }
    }

    /// Whether this light has no position or direction
    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. })
    }
}
