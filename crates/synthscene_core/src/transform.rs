//! 3D Transform (position, rotation, scale)
//!
//! A Transform represents the position, rotation, and scale of an object in
//! Blender's Z-up world space.

use synthscene_math::{Vec3, Quat};
use serde::{Serialize, Deserialize};

/// A 3D transform with position, rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Whether position, rotation and scale hold only finite numbers
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Transform a point from local space to world space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p.component_mul(self.scale)) + self.position
    }

    /// Transform a direction from local space to world space
    ///
    /// Applies rotation only.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.rotate(d)
    }

    /// Orient so the local -Z axis points at `target`, keeping world +Z up.
    ///
    /// This is how Blender cameras and sun lights are aimed. When the view
    /// direction is parallel to +Z, +Y is used as the up hint. Does nothing
    /// if `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalized();
        if forward == Vec3::ZERO {
            return;
        }

        let up_hint = if forward.cross(Vec3::Z).length_squared() < 1e-10 {
            Vec3::Y
        } else {
            Vec3::Z
        };

        let right = forward.cross(up_hint).normalized();
        let up = right.cross(forward);
        self.rotation = Quat::from_rotation_axes(right, up, -forward);
    }

    /// Direction the local -Z axis points to in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation.rotate(-Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(p), p));
    }

    #[test]
    fn test_transform_order() {
        // Transform applies: scale, then rotate, then translate
        let t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_axis_angle(Vec3::Z, PI / 2.0),
            scale: Vec3::splat(2.0),
        };

        // X * 2 = (2, 0, 0), rotated 90° about Z = (0, 2, 0), + (10, 0, 0) = (10, 2, 0)
        let transformed = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(transformed, Vec3::new(10.0, 2.0, 0.0)),
            "Expected (10, 2, 0), got {:?}", transformed);
    }

    #[test]
    fn test_transform_direction_ignores_position() {
        let t = Transform::from_position(Vec3::new(100.0, 100.0, 100.0));
        assert!(vec_approx_eq(t.transform_direction(Vec3::X), Vec3::X));
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut t = Transform::from_position(Vec3::new(2.0, 2.0, 2.0));
        let target = Vec3::new(0.0, 0.0, 0.25);
        t.look_at(target);

        let expected = (target - t.position).normalized();
        assert!(vec_approx_eq(t.forward(), expected), "forward was {:?}", t.forward());
    }

    #[test]
    fn test_look_at_keeps_up_in_vertical_plane() {
        let mut t = Transform::from_position(Vec3::new(0.0, -5.0, 0.0));
        t.look_at(Vec3::ZERO);

        // Local +Y maps to world +Z when looking horizontally
        assert!(vec_approx_eq(t.transform_direction(Vec3::Y), Vec3::Z));
        assert!(vec_approx_eq(t.transform_direction(Vec3::X), Vec3::X));
    }

    #[test]
    fn test_look_at_straight_down() {
        let mut t = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        t.look_at(Vec3::ZERO);
        assert!(vec_approx_eq(t.forward(), -Vec3::Z));
    }

    #[test]
    fn test_look_at_self_is_noop() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.look_at(Vec3::ONE);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
