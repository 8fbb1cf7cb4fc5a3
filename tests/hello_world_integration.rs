//! Integration tests for building the hello-world scene with an asset source

use std::fs::File;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use synthscene::config::SceneConfig;
use synthscene::scene::{hello_world_scene, HelloWorldOptions};
use synthscene_assets::{AssetSource, PROPERTIES_FILE};
use synthscene_core::{ObjectKind, SceneValidator};

fn write_cube_archive(dir: &Path) {
    let file = File::create(dir.join("cube.tar.gz")).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let files = [
        (
            "cube/data.json",
            r#"{"paths": {"visual_geometry": ["visual_geometry.obj"], "urdf": ["object.urdf"]}, "mass": 0.4}"#,
        ),
        ("cube/object.urdf", "<robot name=\"cube\"/>"),
        ("cube/visual_geometry.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"),
    ];
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn test_hello_world_places_asset_and_registers_scene() {
    let remote = tempfile::tempdir().unwrap();
    write_cube_archive(remote.path());
    let mut source = AssetSource::new(remote.path().to_str().unwrap(), None).unwrap();

    let options = HelloWorldOptions {
        mesh: None,
        asset: Some((&mut source, "cube".to_string())),
    };
    let config = SceneConfig::default();
    let scene = hello_world_scene(&config, options).unwrap();
    assert!(SceneValidator::validate(&scene).is_empty());

    let assets: Vec<_> = scene
        .iter()
        .filter_map(|(_, object)| match &object.kind {
            ObjectKind::FileBased(file) => Some((object.name(), file)),
            _ => None,
        })
        .collect();
    assert_eq!(assets.len(), 1);
    let (name, file) = assets[0];
    // The mesh cube already holds the plain name
    assert_eq!(name, Some("cube.001"));
    assert_eq!(file.asset_id, "cube");
    assert_eq!(file.physics.mass, 0.4);
    assert!(file.simulation_filename.is_file());

    let properties = source.local_dir().join("cube").join(PROPERTIES_FILE);
    let handle = source.cache().handle_for(&properties).unwrap();
    assert_eq!(source.cache().dependents(&handle).unwrap(), vec!["helloworld"]);
}

#[test]
fn test_unknown_asset_fails_the_scene() {
    let remote = tempfile::tempdir().unwrap();
    write_cube_archive(remote.path());
    let mut source = AssetSource::new(remote.path().to_str().unwrap(), None).unwrap();

    let options = HelloWorldOptions {
        mesh: None,
        asset: Some((&mut source, "teapot".to_string())),
    };
    assert!(hello_world_scene(&SceneConfig::default(), options).is_err());
    assert_eq!(source.cache().asset_count(), 0);
}
