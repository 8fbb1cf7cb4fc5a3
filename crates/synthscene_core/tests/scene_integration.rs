//! Integration tests for building, validating and persisting scenes

use std::fs;

use synthscene_core::{
    AnimatedProperty, BufferGeometry, Camera, FileBasedObject, Geometry, Light, Material, Mesh,
    Object3D, PhysicalOverrides, PhysicalProperties, Scene, SceneObject, SceneValidator,
    ValidationError,
};
use synthscene_math::{Color, Vec3};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

/// Camera, sun, animated cube and a floor
fn small_scene() -> Scene {
    let mut scene = Scene::new("integration").with_frame_range(0, 10);

    let camera = scene.add(SceneObject::camera(
        Object3D::new()
            .with_name("camera")
            .with_position([2.0, 2.0, 2.0])
            .looking_at([0.0, 0.0, 0.25]),
        Camera::orthographic_bounds(-0.5, 0.5, 0.5, -0.5),
    ));
    scene.set_camera(camera);

    scene.add(SceneObject::light(
        Object3D::new().with_name("sun").with_position([0.5, -0.5, 2.0]),
        Light::directional(Color::WHITE).with_intensity(2.0),
    ));

    let mut cube = Object3D::new().with_name("cube");
    cube.keyframe_insert(AnimatedProperty::Position, 0);
    cube.transform.position = Vec3::new(0.0, 0.0, 1.0);
    cube.keyframe_insert(AnimatedProperty::Position, 10);
    scene.add(SceneObject::mesh(cube, Mesh::new(Geometry::Box, Material::flat(Color::from_hex(0x44aa88)))));

    scene.add(SceneObject::mesh(
        Object3D::new().with_name("floor").with_scale([2.0, 2.0, 2.0]),
        Mesh::new(Geometry::Plane, Material::shadow()),
    ));

    scene
}

#[test]
fn test_valid_scene_has_no_errors() {
    let scene = small_scene();
    assert!(SceneValidator::validate_or_error(&scene).is_ok());
    assert_eq!(scene.frame_count(), 11);
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.ron");

    let scene = small_scene();
    scene.save(&path).unwrap();
    let loaded = Scene::load(&path).unwrap();

    assert_eq!(loaded.name, "integration");
    assert_eq!(loaded.len(), scene.len());
    assert_eq!(loaded.frame_start, 0);
    assert_eq!(loaded.frame_end, 10);

    // The active camera key survives serialization
    let (camera_obj, camera) = loaded.active_camera().unwrap();
    assert_eq!(camera_obj.name(), Some("camera"));
    assert!(matches!(camera, Camera::Orthographic { .. }));

    let (_, cube) = loaded.get_by_name("cube").unwrap();
    assert_eq!(cube.object.keyframes.frames(), vec![0, 10]);
    assert!(SceneValidator::validate(&loaded).is_empty());
}

#[test]
fn test_load_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Scene::load(dir.path().join("missing.ron")).is_err());

    let bad = dir.path().join("bad.ron");
    fs::write(&bad, "Scene(name: ").unwrap();
    let err = Scene::load(&bad).unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_keyframes_interpolate_linearly() {
    let scene = small_scene();
    let (_, cube) = scene.get_by_name("cube").unwrap();

    assert!(approx(cube.object.transform_at(0).position, Vec3::ZERO));
    assert!(approx(cube.object.transform_at(5).position, Vec3::new(0.0, 0.0, 0.5)));
    assert!(approx(cube.object.transform_at(10).position, Vec3::new(0.0, 0.0, 1.0)));
    // Held outside the keyed range
    assert!(approx(cube.object.transform_at(20).position, Vec3::new(0.0, 0.0, 1.0)));
    // Unanimated properties keep their static value
    assert!(approx(cube.object.transform_at(5).scale, Vec3::ONE));
}

#[test]
fn test_removing_camera_invalidates_scene() {
    let mut scene = small_scene();
    let camera = scene.camera.unwrap();
    scene.remove(camera);

    let errors = SceneValidator::validate(&scene);
    assert_eq!(errors, vec![ValidationError::MissingCamera]);
}

#[test]
fn test_validator_collects_every_problem() {
    let mut scene = small_scene().with_frame_range(5, 1);
    scene.add(SceneObject::mesh(
        Object3D::new().with_name("cube"),
        Mesh::new(Geometry::sphere(), Material::phong(Color::GRAY)),
    ));
    let physics = PhysicalOverrides::new().with_friction(1.5).resolve();
    scene.add(SceneObject::file_based(
        Object3D::new(),
        FileBasedObject::new("chair", "chair/object.urdf", "chair/visual_geometry.obj").with_physics(physics),
    ));

    let errors = SceneValidator::validate(&scene);
    assert!(errors.contains(&ValidationError::InvertedFrameRange { start: 5, end: 1 }));
    assert!(errors.contains(&ValidationError::DuplicateName("cube".to_string())));
    // Unnamed asset objects are named after their asset id
    assert!(errors.contains(&ValidationError::UnphysicalProperties("chair".to_string())));
}

#[test]
fn test_overrides_take_precedence_over_asset_defaults() {
    let defaults = PhysicalOverrides::new().with_mass(3.0).with_friction(0.2);
    let resolved = PhysicalOverrides::new().with_mass(0.5).or(defaults).resolve();

    assert_eq!(resolved.mass, 0.5);
    assert_eq!(resolved.friction, 0.2);
    assert_eq!(resolved.restitution, PhysicalProperties::default().restitution);
}

#[test]
fn test_obj_mesh_in_scene() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.obj");
    fs::write(
        &path,
        "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    )
    .unwrap();

    let geometry = BufferGeometry::from_obj(&path).unwrap();
    let bounds = geometry.bounds().unwrap();
    assert!(approx(bounds.min, Vec3::ZERO));
    assert!(approx(bounds.max, Vec3::new(1.0, 1.0, 0.0)));

    let mut scene = small_scene();
    scene.add(SceneObject::mesh(
        Object3D::new().with_name("quad"),
        Mesh::new(Geometry::Buffer(geometry), Material::phong(Color::WHITE)),
    ));
    assert!(SceneValidator::validate(&scene).is_empty());
}
