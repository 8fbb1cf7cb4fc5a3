//! Axis-aligned bounding box

use serde::{Serialize, Deserialize};
use crate::Vec3;

/// Axis-aligned bounding box
///
/// Serializes as a pair of corners, `[[min_x, min_y, min_z], [max_x, max_y, max_z]]`,
/// which is the layout asset property files use for `bounds`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f32; 3]; 2]", into = "[[f32; 3]; 2]")]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Smallest box containing all points, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.min_components(p),
            max: acc.max.max_components(p),
        }))
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl From<[[f32; 3]; 2]> for Aabb {
    fn from(corners: [[f32; 3]; 2]) -> Self {
        Self::new(corners[0].into(), corners[1].into())
    }
}

impl From<Aabb> for [[f32; 3]; 2] {
    fn from(aabb: Aabb) -> Self {
        [aabb.min.to_array(), aabb.max.to_array()]
    }
}
