//! 3D Mathematics Library
//!
//! This crate provides the small set of value types the SynthScene scene graph
//! is built on.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion for 3D rotations
//! - [`Color`] - sRGB color with alpha
//! - [`Aabb`] - Axis-aligned bounding box

mod vec3;
mod quat;
mod color;
mod aabb;

pub use vec3::Vec3;
pub use quat::Quat;
pub use color::Color;
pub use aabb::Aabb;
