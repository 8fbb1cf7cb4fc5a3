//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for assembling a shot: camera, lights, meshes and
//! asset objects, plus the frame range to render.

use synthscene_assets::{AssetError, AssetSource};
use synthscene_core::{
    Camera, Light, Mesh, Object3D, PhysicalOverrides, Scene, SceneObject,
};
use synthscene_math::{Color, Vec3};

use crate::config::SceneConfig;

/// Builder for constructing scenes
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new("helloworld")
///     .with_frame_range(0, 10)
///     .add_orthographic_camera(Vec3::new(2.0, 2.0, 2.0), Vec3::new(0.0, 0.0, 0.25), 1.0)
///     .add_ambient_light(Color::from_hex(0x030303))
///     .add_mesh(Object3D::new().with_name("cube"), Mesh::new(Geometry::Box, Material::default()))
///     .build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    /// Create a builder for an empty scene
    pub fn new(name: &str) -> Self {
        Self {
            scene: Scene::new(name),
        }
    }

    /// Create a builder with name and timing from configuration
    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(&config.name)
            .with_frame_range(config.frame_start, config.frame_end)
            .with_frame_rate(config.frame_rate)
    }

    /// Set the inclusive frame range
    pub fn with_frame_range(mut self, start: i32, end: i32) -> Self {
        self.scene.frame_start = start;
        self.scene.frame_end = end;
        self
    }

    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.scene.frame_rate = fps;
        self
    }

    /// Add an orthographic camera at `position` looking at `target`
    ///
    /// The camera becomes the active camera.
    pub fn add_orthographic_camera(self, position: Vec3, target: Vec3, scale: f32) -> Self {
        self.add_camera(position, target, Camera::Orthographic { orthographic_scale: scale })
    }

    /// Add a perspective camera at `position` looking at `target`
    ///
    /// The camera becomes the active camera.
    pub fn add_perspective_camera(self, position: Vec3, target: Vec3, focal_length: f32) -> Self {
        self.add_camera(
            position,
            target,
            Camera::perspective_with(focal_length, synthscene_core::DEFAULT_SENSOR_WIDTH),
        )
    }

    /// Add any camera and make it the active one
    pub fn add_camera(mut self, position: Vec3, target: Vec3, camera: Camera) -> Self {
        let object = Object3D::new()
            .with_name("camera")
            .with_position(position)
            .looking_at(target);
        let key = self.scene.add(SceneObject::camera(object, camera));
        self.scene.set_camera(key);
        self
    }

    /// Add ambient illumination
    pub fn add_ambient_light(mut self, color: Color) -> Self {
        self.scene.add(SceneObject::light(Object3D::new(), Light::ambient(color)));
        self
    }

    /// Add a sun at `position` shining towards `target`
    pub fn add_directional_light(mut self, position: Vec3, target: Vec3, color: Color, intensity: f32) -> Self {
        let object = Object3D::new()
            .with_name("sun")
            .with_position(position)
            .looking_at(target);
        self.scene.add(SceneObject::light(
            object,
            Light::directional(color).with_intensity(intensity),
        ));
        self
    }

    /// Add a mesh with its transform and keyframes already set on `object`
    pub fn add_mesh(mut self, object: Object3D, mesh: Mesh) -> Self {
        self.scene.add(SceneObject::mesh(object, mesh));
        self
    }

    /// Fetch `asset_id` from `source` and place it with the transform of `object`
    ///
    /// The scene is recorded as a dependent of the asset's cached properties.
    /// An unnamed `object` is named after the asset, with a `.001`-style
    /// suffix when that name is taken.
    pub fn add_asset(
        mut self,
        source: &mut AssetSource,
        asset_id: &str,
        object: Object3D,
        overrides: PhysicalOverrides,
    ) -> Result<Self, AssetError> {
        let file_object = source.create(asset_id, overrides)?;
        let fetched = source.fetch(asset_id)?;
        source.cache_mut().add_dependent(&fetched.handle, &self.scene.name);

        let object = if object.name.is_some() {
            object
        } else {
            let name = self.unique_name(asset_id);
            object.with_name(name)
        };
        log::info!("Added asset '{}' to scene '{}'", asset_id, self.scene.name);
        self.scene.add(SceneObject::file_based(object, file_object));
        Ok(self)
    }

    fn unique_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 0;
        while self.scene.get_by_name(&name).is_some() {
            suffix += 1;
            name = format!("{}.{:03}", base, suffix);
        }
        name
    }

    /// Finish and return the scene
    pub fn build(self) -> Scene {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthscene_core::{Geometry, Material, SceneValidator};

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuilder::new("empty").build();
        assert!(scene.is_empty());
        assert!(scene.camera.is_none());
    }

    #[test]
    fn test_camera_is_active() {
        let scene = SceneBuilder::new("cam")
            .add_orthographic_camera(Vec3::new(2.0, 2.0, 2.0), Vec3::new(0.0, 0.0, 0.25), 1.0)
            .build();
        let (object, camera) = scene.active_camera().unwrap();
        assert_eq!(object.name(), Some("camera"));
        assert_eq!(*camera, Camera::Orthographic { orthographic_scale: 1.0 });

        let forward = object.object.transform.forward();
        let expected = (Vec3::new(0.0, 0.0, 0.25) - Vec3::new(2.0, 2.0, 2.0)).normalized();
        assert!((forward - expected).length() < 1e-5);
    }

    #[test]
    fn test_perspective_camera_replaces_active() {
        let scene = SceneBuilder::new("cam")
            .add_orthographic_camera(Vec3::Z, Vec3::ZERO, 1.0)
            .add_perspective_camera(Vec3::new(0.0, -5.0, 1.0), Vec3::ZERO, 35.0)
            .build();
        let (_, camera) = scene.active_camera().unwrap();
        assert_eq!(camera.kind_name(), "perspective");
    }

    #[test]
    fn test_lights_and_meshes() {
        let scene = SceneBuilder::new("lit")
            .with_frame_range(0, 10)
            .add_perspective_camera(Vec3::new(0.0, -5.0, 1.0), Vec3::ZERO, 50.0)
            .add_ambient_light(Color::from_hex(0x030303))
            .add_directional_light(Vec3::new(0.5, -0.5, 2.0), Vec3::ZERO, Color::WHITE, 2.0)
            .add_mesh(
                Object3D::new().with_name("cube"),
                Mesh::new(Geometry::Box, Material::flat(Color::WHITE)),
            )
            .build();

        assert_eq!(scene.len(), 4);
        assert_eq!(scene.frame_start, 0);
        let (_, sun) = scene.get_by_name("sun").unwrap();
        assert_eq!(sun.as_light().unwrap().intensity(), Some(2.0));
        assert!(SceneValidator::validate(&scene).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = SceneConfig {
            name: "configured".to_string(),
            frame_start: 5,
            frame_end: 15,
            frame_rate: 30,
        };
        let scene = SceneBuilder::from_config(&config).build();
        assert_eq!(scene.name, "configured");
        assert_eq!(scene.frame_count(), 11);
        assert_eq!(scene.frame_rate, 30);
    }

    #[test]
    fn test_unique_name_skips_taken_names() {
        let builder = SceneBuilder::new("names")
            .add_mesh(Object3D::new().with_name("cube"), Mesh::new(Geometry::Box, Material::default()))
            .add_mesh(Object3D::new().with_name("cube.001"), Mesh::new(Geometry::Box, Material::default()));
        assert_eq!(builder.unique_name("sphere"), "sphere");
        assert_eq!(builder.unique_name("cube"), "cube.002");
    }
}
