//! Camera types
//!
//! Cameras are declarative: they carry the lens parameters the backend
//! needs and nothing else. Like every object they look down their local -Z
//! axis with local +Y up.

use serde::{Serialize, Deserialize};

/// Default focal length in millimeters
pub const DEFAULT_FOCAL_LENGTH: f32 = 50.0;
/// Default sensor width in millimeters (full-frame 35mm)
pub const DEFAULT_SENSOR_WIDTH: f32 = 36.0;
/// Default orthographic scale in world units
pub const DEFAULT_ORTHOGRAPHIC_SCALE: f32 = 6.0;

/// A camera
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Camera {
    /// Placeholder for a scene that has no camera configured yet
    #[default]
    Undefined,
    /// Pinhole camera described by focal length and sensor width (mm)
    Perspective {
        focal_length: f32,
        sensor_width: f32,
    },
    /// Parallel projection; `orthographic_scale` is the visible extent of the
    /// larger image side in world units
    Orthographic {
        orthographic_scale: f32,
    },
}

impl Camera {
    /// Perspective camera with the default 50mm lens on a 36mm sensor
    pub fn perspective() -> Self {
        Camera::Perspective {
            focal_length: DEFAULT_FOCAL_LENGTH,
            sensor_width: DEFAULT_SENSOR_WIDTH,
        }
    }

    /// Perspective camera with a custom lens
    pub fn perspective_with(focal_length: f32, sensor_width: f32) -> Self {
        Camera::Perspective { focal_length, sensor_width }
    }

    /// Orthographic camera with the default scale
    pub fn orthographic() -> Self {
        Camera::Orthographic {
            orthographic_scale: DEFAULT_ORTHOGRAPHIC_SCALE,
        }
    }

    /// Orthographic camera covering the given view bounds
    ///
    /// The backend fits the scale to the larger image side, so the scale is
    /// the larger of the horizontal and vertical extents.
    pub fn orthographic_bounds(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        let width = (right - left).abs();
        let height = (top - bottom).abs();
        Camera::Orthographic {
            orthographic_scale: width.max(height),
        }
    }

    /// Horizontal field of view in radians, `None` unless perspective
    pub fn field_of_view(&self) -> Option<f32> {
        match self {
            Camera::Perspective { focal_length, sensor_width } => {
                Some(2.0 * (sensor_width / 2.0 / focal_length).atan())
            }
            _ => None,
        }
    }

    /// Whether this is the undefined placeholder
    pub fn is_undefined(&self) -> bool {
        matches!(self, Camera::Undefined)
    }

    /// Short name of the camera kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Camera::Undefined => "undefined",
            Camera::Perspective { .. } => "perspective",
            Camera::Orthographic { .. } => "orthographic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_defaults() {
        match Camera::perspective() {
            Camera::Perspective { focal_length, sensor_width } => {
                assert_eq!(focal_length, 50.0);
                assert_eq!(sensor_width, 36.0);
            }
            other => panic!("Expected perspective camera, got {:?}", other),
        }
    }

    #[test]
    fn test_field_of_view() {
        let fov = Camera::perspective().field_of_view().unwrap();
        let expected = 2.0 * (18.0f32 / 50.0).atan();
        assert!((fov - expected).abs() < 1e-6);
        // About 39.6 degrees
        assert!((fov.to_degrees() - 39.6).abs() < 0.1);
    }

    #[test]
    fn test_field_of_view_equal_lens_and_half_sensor() {
        let fov = Camera::perspective_with(18.0, 36.0).field_of_view().unwrap();
        assert!((fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_orthographic_has_no_fov() {
        assert!(Camera::orthographic().field_of_view().is_none());
        assert!(Camera::Undefined.field_of_view().is_none());
    }

    #[test]
    fn test_orthographic_bounds() {
        let cam = Camera::orthographic_bounds(-0.5, 0.5, 0.5, -0.5);
        assert_eq!(cam, Camera::Orthographic { orthographic_scale: 1.0 });

        let wide = Camera::orthographic_bounds(-2.0, 2.0, 0.5, -0.5);
        assert_eq!(wide, Camera::Orthographic { orthographic_scale: 4.0 });
    }

    #[test]
    fn test_default_is_undefined() {
        assert!(Camera::default().is_undefined());
        assert_eq!(Camera::default().kind_name(), "undefined");
    }
}
