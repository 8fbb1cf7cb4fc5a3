//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;

use synthscene::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SYNTH_RENDER__SAMPLES", "7");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.render.samples, 7);
    std::env::remove_var("SYNTH_RENDER__SAMPLES");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("SYNTH_RENDER__SAMPLES");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert_eq!(config.scene.name, "helloworld");
    assert_eq!(config.render.engine, "cycles");
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[render]\nwidth = 640\nheight = 480\nsamples = 64\nengine = \"cycles\"\nblender_executable = \"blender\"\npasses = [\"image\"]\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("user.toml"),
        "[render]\nwidth = 1024\nheight = 480\nsamples = 64\nengine = \"eevee\"\nblender_executable = \"/opt/blender/blender\"\npasses = [\"image\", \"depth\"]\n",
    )
    .unwrap();

    let config = AppConfig::load_from(dir.path()).unwrap();
    assert_eq!(config.render.width, 1024);
    assert_eq!(config.render.engine, "eevee");
    assert_eq!(config.render.passes, vec!["image", "depth"]);
    // Sections absent from both files fall back to defaults
    assert_eq!(config.output.path, std::path::PathBuf::from("helloworld.png"));
}

#[test]
#[serial]
fn test_env_overrides_nested_option() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SYNTH_ASSETS__SOURCE", "gs://kubric-public/KuBasic");
    std::env::set_var("SYNTH_OUTPUT__PUBLISH_DIR", "/mnt/renders");
    let config = AppConfig::load_from(dir.path()).unwrap();
    std::env::remove_var("SYNTH_ASSETS__SOURCE");
    std::env::remove_var("SYNTH_OUTPUT__PUBLISH_DIR");

    assert_eq!(config.assets.source.as_deref(), Some("gs://kubric-public/KuBasic"));
    assert_eq!(
        config.output.publish_dir,
        Some(std::path::PathBuf::from("/mnt/renders"))
    );
}

#[test]
#[serial]
fn test_invalid_value_is_error() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SYNTH_RENDER__WIDTH", "wide");
    let result = AppConfig::load_from(dir.path());
    std::env::remove_var("SYNTH_RENDER__WIDTH");
    assert!(result.is_err());
}
