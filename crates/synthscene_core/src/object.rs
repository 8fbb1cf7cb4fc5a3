//! Common base for everything placed in a scene

use serde::{Serialize, Deserialize};
use synthscene_math::{Vec3, Quat};

use crate::keyframe::{AnimatedProperty, Keyframes};
use crate::Transform;

/// Name, transform and animation shared by cameras, lights and meshes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Object3D {
    /// Optional name (for lookup and for the object name in the backend)
    #[serde(default)]
    pub name: Option<String>,
    /// Transform at the current frame
    #[serde(default)]
    pub transform: Transform,
    /// Animation tracks
    #[serde(default)]
    pub keyframes: Keyframes,
}

impl Object3D {
    /// Create an unnamed object at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of this object
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: impl Into<Vec3>) -> Self {
        self.transform.position = position.into();
        self
    }

    /// Set the per-axis scale
    pub fn with_scale(mut self, scale: impl Into<Vec3>) -> Self {
        self.transform.scale = scale.into();
        self
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Orient the object towards `target` (builder form of [`look_at`](Self::look_at))
    pub fn looking_at(mut self, target: impl Into<Vec3>) -> Self {
        self.look_at(target);
        self
    }

    /// Orient the object so its local -Z axis points at `target`
    pub fn look_at(&mut self, target: impl Into<Vec3>) {
        self.transform.look_at(target.into());
    }

    /// Record the current value of `property` as a keyframe at `frame`
    pub fn keyframe_insert(&mut self, property: AnimatedProperty, frame: i32) {
        self.keyframes.insert(property, frame, &self.transform);
    }

    /// Evaluate the transform at `frame`
    ///
    /// Animated properties are sampled from their tracks; the rest keep the
    /// current transform value.
    pub fn transform_at(&self, frame: i32) -> Transform {
        Transform {
            position: self.keyframes.position_at(frame).unwrap_or(self.transform.position),
            rotation: self.keyframes.rotation_at(frame).unwrap_or(self.transform.rotation),
            scale: self.keyframes.scale_at(frame).unwrap_or(self.transform.scale),
        }
    }
}
