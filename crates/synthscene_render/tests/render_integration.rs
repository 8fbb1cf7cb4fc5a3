//! Integration tests for the renderer with a recording backend

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use synthscene_core::{
    AnimatedProperty, Camera, Geometry, Light, Material, Mesh, Object3D, Scene, SceneObject,
};
use synthscene_math::{Color, Vec3};
use synthscene_render::{
    BlenderScript, Engine, OutputKind, RenderBackend, RenderError, RenderJob, RenderPasses,
    Renderer, SceneAnnotations,
};

/// Keeps the generated script of every job and writes placeholder outputs
#[derive(Default)]
struct RecordingBackend {
    scripts: Rc<RefCell<Vec<String>>>,
}

impl RenderBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn render(&self, job: &RenderJob<'_>) -> Result<(), RenderError> {
        let script = BlenderScript::generate(job, Engine::Cycles)?;
        self.scripts.borrow_mut().push(script.as_str().to_string());
        for file in job.expected_files() {
            fs::write(file, b"placeholder")?;
        }
        Ok(())
    }
}

fn hello_scene() -> Scene {
    let mut scene = Scene::new("hello").with_frame_range(0, 10);
    let camera = scene.add(SceneObject::camera(
        Object3D::new()
            .with_name("camera")
            .with_position((2.0, 2.0, 2.0))
            .looking_at((0.0, 0.0, 0.25)),
        Camera::orthographic_bounds(-0.5, 0.5, 0.5, -0.5),
    ));
    scene.set_camera(camera);
    scene.add(SceneObject::light(Object3D::new(), Light::ambient(Color::from_hex(0x030303))));

    let mut cube = Object3D::new()
        .with_name("cube")
        .with_scale((0.1, 0.1, 0.1))
        .with_position((0.0, 0.2, 0.05));
    cube.keyframe_insert(AnimatedProperty::Position, 0);
    cube.transform.position = Vec3::new(0.0, 0.5, 0.25);
    cube.keyframe_insert(AnimatedProperty::Position, 10);
    scene.add(SceneObject::mesh(cube, Mesh::new(Geometry::Box, Material::flat(Color::WHITE))));
    scene
}

fn renderer(scripts: Rc<RefCell<Vec<String>>>) -> Renderer {
    let mut renderer = Renderer::new(Box::new(RecordingBackend { scripts }))
        .with_samples(8)
        .with_passes(RenderPasses::IMAGE | RenderPasses::DEPTH);
    renderer.set_size(200, 200);
    renderer
}

#[test]
fn test_still_with_passes_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = Rc::new(RefCell::new(Vec::new()));
    let renderer = renderer(scripts.clone());
    let output = dir.path().join("helloworld.png");

    let mut published: Vec<PathBuf> = Vec::new();
    renderer
        .render(&hello_scene(), &output, |p| published.push(p.to_path_buf()))
        .unwrap();

    assert_eq!(
        published,
        vec![
            output.clone(),
            dir.path().join("helloworld_passes_0000.exr"),
            dir.path().join("helloworld_metadata.json"),
        ]
    );

    let scripts = scripts.borrow();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("scene.render.resolution_x = 200"));
    assert!(scripts[0].contains("view_layer.use_pass_z = True"));

    let annotations = SceneAnnotations::load(&dir.path().join("helloworld_metadata.json")).unwrap();
    assert_eq!(annotations.scene, "hello");
    assert_eq!(annotations.camera.kind, "orthographic");
    assert_eq!(annotations.camera.orthographic_scale, Some(1.0));
    assert_eq!(annotations.objects.len(), 1);
    assert_eq!(annotations.objects[0].trajectory.positions.len(), 11);
    assert_eq!(annotations.objects[0].trajectory.scales[0], [0.1, 0.1, 0.1]);
}

#[test]
fn test_camera_trajectory_looks_at_target() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(Rc::new(RefCell::new(Vec::new())));
    let output = dir.path().join("shot.png");
    renderer.render(&hello_scene(), &output, |_| {}).unwrap();

    let annotations = SceneAnnotations::load(&dir.path().join("shot_metadata.json")).unwrap();
    let [w, x, y, z] = annotations.camera.trajectory.quaternions[0];
    let rotation = synthscene_math::Quat::new(w, x, y, z);
    let forward = rotation.rotate(-Vec3::Z);
    let expected = (Vec3::new(0.0, 0.0, 0.25) - Vec3::new(2.0, 2.0, 2.0)).normalized();
    assert!((forward - expected).length() < 1e-4);
}

#[test]
fn test_sequence_reports_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = Renderer::new(Box::new(RecordingBackend::default()));
    let prefix = dir.path().join("helloworld").join("frame_");

    let mut count = 0;
    let written = renderer.render(&hello_scene(), &prefix, |_| count += 1).unwrap();

    assert_eq!(count, 12);
    assert_eq!(written[0], dir.path().join("helloworld/frame_0000.png"));
    assert_eq!(written[10], dir.path().join("helloworld/frame_0010.png"));
    assert_eq!(written[11], dir.path().join("helloworld/frame_metadata.json"));
}

#[test]
fn test_scene_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = Renderer::new(Box::new(RecordingBackend::default()));
    let output = dir.path().join("helloworld.blend");
    let written = renderer.render(&hello_scene(), &output, |_| {}).unwrap();
    assert_eq!(written, vec![output]);
    assert!(OutputKind::from_path(Path::new("helloworld.blend")).unwrap().is_scene_file());
}

#[test]
fn test_scene_without_camera_is_rejected() {
    let mut scene = hello_scene();
    scene.camera = None;
    let renderer = Renderer::new(Box::new(RecordingBackend::default()));
    let result = renderer.render(&scene, "unused.png", |_| {});
    assert!(matches!(result, Err(RenderError::MissingCamera)));
}
