//! Scene validation
//!
//! Validates scenes for common errors before they are handed to a render
//! backend. The [`SceneValidator`] checks for issues like empty scenes,
//! duplicate object names, missing cameras, degenerate lenses and
//! unphysical material values.

use std::collections::HashSet;

use crate::camera::Camera;
use crate::mesh::Geometry;
use crate::scene::{ObjectKind, Scene};

/// Validation error found in a scene
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Scene has no objects
    EmptyScene,
    /// Duplicate object name found
    DuplicateName(String),
    /// Frame range ends before it starts
    InvertedFrameRange { start: i32, end: i32 },
    /// No active camera is set
    MissingCamera,
    /// The active camera key does not refer to a live object
    DanglingCamera,
    /// The active camera key refers to an object that is not a camera
    NotACamera(String),
    /// The active camera is the undefined placeholder
    UndefinedCamera,
    /// Focal length, sensor width or orthographic scale is not positive
    InvalidLens(String),
    /// Mass is negative, or friction/restitution is outside [0, 1]
    UnphysicalProperties(String),
    /// Buffer geometry references vertices that do not exist
    InvalidGeometry(String),
    /// Transform or keyframe holds NaN or infinity
    NonFiniteTransform(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no objects"),
            ValidationError::DuplicateName(name) => {
                write!(f, "Duplicate object name: '{}'", name)
            }
            ValidationError::InvertedFrameRange { start, end } => {
                write!(f, "Frame range ends before it starts: {}..{}", start, end)
            }
            ValidationError::MissingCamera => write!(f, "Scene has no active camera"),
            ValidationError::DanglingCamera => {
                write!(f, "Active camera refers to a removed object")
            }
            ValidationError::NotACamera(name) => {
                write!(f, "Active camera '{}' is not a camera", name)
            }
            ValidationError::UndefinedCamera => write!(f, "Active camera is undefined"),
            ValidationError::InvalidLens(name) => {
                write!(f, "Camera '{}' has a non-positive lens parameter", name)
            }
            ValidationError::UnphysicalProperties(name) => {
                write!(f, "Object '{}' has unphysical mass, friction or restitution", name)
            }
            ValidationError::InvalidGeometry(name) => {
                write!(f, "Mesh '{}' has invalid geometry", name)
            }
            ValidationError::NonFiniteTransform(name) => {
                write!(f, "Object '{}' has a NaN or infinite transform", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Scene validator that checks for common errors
///
/// # Example
/// ```ignore
/// let errors = SceneValidator::validate(&scene);
/// for error in &errors {
///     log::warn!("Validation error: {}", error);
/// }
/// ```
pub struct SceneValidator;

impl SceneValidator {
    /// Validate a scene, returning all errors found
    ///
    /// Returns an empty vector if no validation errors are detected.
    pub fn validate(scene: &Scene) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if scene.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        if scene.frame_end < scene.frame_start {
            errors.push(ValidationError::InvertedFrameRange {
                start: scene.frame_start,
                end: scene.frame_end,
            });
        }

        let mut seen_names = HashSet::new();
        for (_, obj) in scene.iter() {
            if let Some(name) = obj.name() {
                if !seen_names.insert(name.to_string()) {
                    errors.push(ValidationError::DuplicateName(name.to_string()));
                }
            }
        }

        for (_, obj) in scene.iter() {
            let label = obj.name().unwrap_or("<unnamed>").to_string();
            if !obj.object.transform.is_finite() || !obj.object.keyframes.is_finite() {
                errors.push(ValidationError::NonFiniteTransform(label.clone()));
            }
            match &obj.kind {
                ObjectKind::Camera(camera) => {
                    let valid = match camera {
                        Camera::Perspective { focal_length, sensor_width } => {
                            is_positive(*focal_length) && is_positive(*sensor_width)
                        }
                        Camera::Orthographic { orthographic_scale } => is_positive(*orthographic_scale),
                        Camera::Undefined => true,
                    };
                    if !valid {
                        errors.push(ValidationError::InvalidLens(label));
                    }
                }
                ObjectKind::FileBased(file_object) => {
                    if !file_object.physics.is_physically_valid() {
                        errors.push(ValidationError::UnphysicalProperties(label));
                    }
                }
                ObjectKind::Mesh(mesh) => {
                    if let Geometry::Buffer(buffer) = &mesh.geometry {
                        if buffer.validate().is_err() {
                            errors.push(ValidationError::InvalidGeometry(label));
                        }
                    }
                }
                ObjectKind::Light(_) => {}
            }
        }

        match scene.camera {
            None => errors.push(ValidationError::MissingCamera),
            Some(key) => match scene.get(key) {
                None => errors.push(ValidationError::DanglingCamera),
                Some(obj) => match obj.as_camera() {
                    None => errors.push(ValidationError::NotACamera(
                        obj.name().unwrap_or("<unnamed>").to_string(),
                    )),
                    Some(camera) if camera.is_undefined() => {
                        errors.push(ValidationError::UndefinedCamera)
                    }
                    Some(_) => {}
                },
            },
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(scene: &Scene) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(scene);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
