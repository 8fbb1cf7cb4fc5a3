//! Core scene graph for SynthScene
//!
//! This crate provides the declarative types a shot is described with:
//!
//! - [`Transform`] - Position, rotation, and scale in Blender's Z-up world
//! - [`Object3D`] - Name, transform and keyframes shared by all objects
//! - [`Camera`] - Undefined, perspective or orthographic camera
//! - [`Light`] - Ambient, directional or point light
//! - [`Mesh`] - Primitive or buffer [`Geometry`] with a [`Material`]
//! - [`FileBasedObject`] - Asset instance backed by simulation/render files
//! - [`Scene`] - Container for all objects plus the frame range
//! - [`SceneValidator`] - Static checks before rendering

mod transform;
mod keyframe;
mod object;
mod camera;
mod light;
mod mesh;
mod physics;
mod file_object;
mod scene;
mod scene_validator;

pub use transform::Transform;
pub use keyframe::{AnimatedProperty, Keyframes};
pub use object::Object3D;
pub use camera::{Camera, DEFAULT_FOCAL_LENGTH, DEFAULT_SENSOR_WIDTH, DEFAULT_ORTHOGRAPHIC_SCALE};
pub use light::Light;
pub use mesh::{BufferGeometry, Float32BufferAttribute, Geometry, GeometryError, Material, Mesh};
pub use physics::{PhysicalOverrides, PhysicalProperties};
pub use file_object::FileBasedObject;
pub use scene::{ObjectKey, ObjectKind, Scene, SceneObject, SceneLoadError, SceneSaveError};
pub use scene_validator::{SceneValidator, ValidationError};

// Re-export commonly used math types for convenience
pub use synthscene_math::{Aabb, Color, Quat, Vec3};
