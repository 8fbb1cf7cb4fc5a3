//! Settings for the `synthscene` tool
//!
//! Later layers win:
//! 1. `<dir>/default.toml`, checked in
//! 2. `<dir>/user.toml`, local and ignored by git
//! 3. `SYNTH_<SECTION>__<KEY>` environment variables

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use synthscene_render::{BlenderBackend, Engine, RenderPasses, Renderer};

/// All sections, each optional in every layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Render settings and backend
    #[serde(default)]
    pub render: RenderConfig,
    /// Scene defaults
    #[serde(default)]
    pub scene: SceneConfig,
    /// Asset source
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Output location and publishing
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging and script debugging
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Layers from `./config` plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layers from `dir` plus the environment; missing files are skipped
    pub fn load_from<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let figment = ["default.toml", "user.toml"]
            .iter()
            .map(|name| dir.as_ref().join(name))
            .filter(|path| path.is_file())
            .fold(Figment::new(), |figment, path| figment.merge(Toml::file(path)));

        // SYNTH_RENDER__WIDTH=512 sets render.width
        Ok(figment
            .merge(Env::prefixed("SYNTH_").split("__"))
            .extract()?)
    }

    /// Renderer configured from the `render` and `debug` sections
    pub fn renderer(&self) -> Result<Renderer, ConfigError> {
        let engine: Engine = self.render.engine.parse().map_err(ConfigError::new)?;
        let passes = RenderPasses::from_names(&self.render.passes).map_err(ConfigError::new)?;

        let mut backend = BlenderBackend::new(&self.render.blender_executable).with_engine(engine);
        if let Some(script) = &self.debug.keep_script {
            backend = backend.with_keep_script(script);
        }

        let mut renderer = Renderer::new(Box::new(backend))
            .with_samples(self.render.samples)
            .with_passes(passes);
        renderer.set_size(self.render.width, self.render.height);
        Ok(renderer)
    }
}

/// Render configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel
    pub samples: u32,
    /// Render engine (cycles, eevee, workbench)
    pub engine: String,
    /// Blender executable, looked up on PATH unless absolute
    pub blender_executable: PathBuf,
    /// Passes to write (image, depth, normal, segmentation, flow)
    pub passes: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            samples: 64,
            engine: "cycles".to_string(),
            blender_executable: PathBuf::from("blender"),
            passes: vec!["image".to_string()],
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene name (for logs and metadata)
    pub name: String,
    /// First frame (inclusive)
    pub frame_start: i32,
    /// Last frame (inclusive)
    pub frame_end: i32,
    /// Frames per second
    pub frame_rate: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "helloworld".to_string(),
            frame_start: 0,
            frame_end: 10,
            frame_rate: 24,
        }
    }
}

/// Asset source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Local directory, http(s):// URL or gs:// URI of the asset archives
    pub source: Option<String>,
    /// Where extracted assets are kept (system temp dir if unset)
    pub scratch_dir: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output path; the extension selects still, video, sequence or .blend
    pub path: PathBuf,
    /// Every written file is copied here when set
    pub publish_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("helloworld.png"),
            publish_dir: None,
        }
    }
}

/// Debugging aids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Keep a copy of the generated Blender script at this path
    pub keep_script: Option<PathBuf>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            keep_script: None,
        }
    }
}

/// Invalid or unreadable configuration
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: String) -> Self {
        ConfigError { message }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::new(e.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid configuration: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_hello_world() {
        let config = AppConfig::default();
        assert_eq!(config.render.width, 200);
        assert_eq!(config.scene.frame_end, 10);
        assert!(config.assets.source.is_none());
    }

    #[test]
    fn test_defaults_serialize_to_toml() {
        let toml = toml::to_string(&AppConfig::default()).unwrap();
        assert!(toml.contains("blender_executable"));
        assert!(toml.contains("frame_rate"));
    }

    #[test]
    fn test_renderer_from_config() {
        let mut config = AppConfig::default();
        config.render.width = 320;
        config.render.passes = vec!["image".to_string(), "normal".to_string()];
        let renderer = config.renderer().unwrap();
        assert_eq!(renderer.width, 320);
        assert_eq!(renderer.passes, RenderPasses::IMAGE | RenderPasses::NORMAL);
        assert_eq!(renderer.backend().name(), "blender");
    }

    #[test]
    fn test_bad_engine_is_config_error() {
        let mut config = AppConfig::default();
        config.render.engine = "povray".to_string();
        let err = config.renderer().err().unwrap();
        assert!(err.to_string().contains("povray"));
    }
}
