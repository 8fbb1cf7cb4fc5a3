//! Keyframed animation of object transforms
//!
//! Keys are stored per property and frame. Sampling between keys is linear
//! (normalized-lerp for rotations), which is also the interpolation mode the
//! Blender backend assigns to every inserted key.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};
use synthscene_math::{Vec3, Quat};

use crate::Transform;

/// A transform property that can carry keyframes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimatedProperty {
    Position,
    Rotation,
    Scale,
}

impl AnimatedProperty {
    /// Name of the matching Blender `data_path`
    pub fn data_path(&self) -> &'static str {
        match self {
            AnimatedProperty::Position => "location",
            AnimatedProperty::Rotation => "rotation_quaternion",
            AnimatedProperty::Scale => "scale",
        }
    }
}

impl fmt::Display for AnimatedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimatedProperty::Position => write!(f, "position"),
            AnimatedProperty::Rotation => write!(f, "rotation"),
            AnimatedProperty::Scale => write!(f, "scale"),
        }
    }
}

/// Per-property keyframe tracks
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    #[serde(default)]
    pub position: BTreeMap<i32, Vec3>,
    #[serde(default)]
    pub rotation: BTreeMap<i32, Quat>,
    #[serde(default)]
    pub scale: BTreeMap<i32, Vec3>,
}

impl Keyframes {
    /// Record the value of `property` taken from `transform` at `frame`
    ///
    /// An existing key on the same frame is overwritten.
    pub fn insert(&mut self, property: AnimatedProperty, frame: i32, transform: &Transform) {
        match property {
            AnimatedProperty::Position => {
                self.position.insert(frame, transform.position);
            }
            AnimatedProperty::Rotation => {
                self.rotation.insert(frame, transform.rotation);
            }
            AnimatedProperty::Scale => {
                self.scale.insert(frame, transform.scale);
            }
        }
    }

    /// Whether no property carries any key
    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.rotation.is_empty() && self.scale.is_empty()
    }

    /// Whether every keyed value is finite
    pub fn is_finite(&self) -> bool {
        self.position.values().all(|v| v.is_finite())
            && self.rotation.values().all(|q| q.is_finite())
            && self.scale.values().all(|v| v.is_finite())
    }

    /// Whether the given property carries at least one key
    pub fn is_animated(&self, property: AnimatedProperty) -> bool {
        match property {
            AnimatedProperty::Position => !self.position.is_empty(),
            AnimatedProperty::Rotation => !self.rotation.is_empty(),
            AnimatedProperty::Scale => !self.scale.is_empty(),
        }
    }

    /// Sorted union of all keyed frames
    pub fn frames(&self) -> Vec<i32> {
        let mut frames: Vec<i32> = self
            .position
            .keys()
            .chain(self.rotation.keys())
            .chain(self.scale.keys())
            .copied()
            .collect();
        frames.sort_unstable();
        frames.dedup();
        frames
    }

    /// Interpolated position at `frame`, `None` if position is not animated
    pub fn position_at(&self, frame: i32) -> Option<Vec3> {
        sample(&self.position, frame, |a, b, t| a.lerp(b, t))
    }

    /// Interpolated rotation at `frame`, `None` if rotation is not animated
    pub fn rotation_at(&self, frame: i32) -> Option<Quat> {
        sample(&self.rotation, frame, |a, b, t| a.nlerp(&b, t))
    }

    /// Interpolated scale at `frame`, `None` if scale is not animated
    pub fn scale_at(&self, frame: i32) -> Option<Vec3> {
        sample(&self.scale, frame, |a, b, t| a.lerp(b, t))
    }
}

/// Sample a track, holding the first/last value outside the keyed range
fn sample<T: Copy>(track: &BTreeMap<i32, T>, frame: i32, lerp: impl Fn(T, T, f32) -> T) -> Option<T> {
    let before = track.range(..=frame).next_back();
    let after = track.range(frame..).next();
    match (before, after) {
        (Some((&f0, &v0)), Some((&f1, &v1))) => {
            if f0 == f1 {
                Some(v0)
            } else {
                let t = (frame - f0) as f32 / (f1 - f0) as f32;
                Some(lerp(v0, v1, t))
            }
        }
        (Some((_, &v)), None) | (None, Some((_, &v))) => Some(v),
        (None, None) => None,
    }
}
