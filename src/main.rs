//! `synthscene` - renders the hello-world scene through Blender
//!
//! ```text
//! synthscene --output helloworld.png
//! synthscene --output helloworld/frame_ --mesh spot.obj
//! synthscene --mesh https://example.org/meshes/spot.obj
//! synthscene --assets gs://kubric-public/KuBasic --asset cube --output shot.mov
//! synthscene --dry-run --output helloworld.blend
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use synthscene::config::AppConfig;
use synthscene::publish::Publisher;
use synthscene::scene::{hello_world_scene, HelloWorldOptions};
use synthscene_assets::AssetSource;
use synthscene_render::{BlenderScript, Engine};

/// Render the hello-world scene
#[derive(Parser, Debug)]
#[command(name = "synthscene", version, about)]
struct Cli {
    /// Output path; the extension picks still image, video, frame sequence or .blend
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding default.toml and user.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,

    /// Wavefront OBJ mesh to add next to the cube: local path, http(s):// URL or gs:// URI
    #[arg(long)]
    mesh: Option<String>,

    /// Asset source: local directory, http(s):// URL or gs:// URI
    #[arg(long)]
    assets: Option<String>,

    /// Id of an asset from the source to place at the origin
    #[arg(long)]
    asset: Option<String>,

    /// Write the Blender script without running Blender
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    let (config, config_error) = match AppConfig::load_from(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting SynthScene");
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    if let Err(e) = run(cli, config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<(), Box<dyn Error>> {
    let output = cli.output.unwrap_or_else(|| config.output.path.clone());

    let source_uri = cli.assets.or_else(|| config.assets.source.clone());
    let mut source = match &source_uri {
        Some(uri) => Some(AssetSource::new(uri, config.assets.scratch_dir.as_deref())?),
        None => None,
    };
    let asset = match (cli.asset, source.as_mut()) {
        (Some(id), Some(source)) => Some((source, id)),
        (Some(id), None) => return Err(format!("--asset {} needs an asset source", id).into()),
        (None, _) => None,
    };

    let options = HelloWorldOptions { mesh: cli.mesh, asset };
    let scene = hello_world_scene(&config.scene, options)?;
    log::info!("Built scene '{}' with {} objects", scene.name, scene.len());

    let renderer = config.renderer()?;

    if cli.dry_run {
        let engine: Engine = config.render.engine.parse()?;
        let job = renderer.prepare(&scene, &output)?;
        let script_path = config
            .debug
            .keep_script
            .clone()
            .unwrap_or_else(|| output.with_extension("py"));
        BlenderScript::generate(&job, engine)?.write(&script_path)?;
        log::info!("Wrote Blender script to {}", script_path.display());
        return Ok(());
    }

    let mut publisher = Publisher::new(config.output.publish_dir.clone()).with_root(std::env::current_dir()?);
    let written = renderer.render(&scene, &output, |path| publisher.publish(path))?;
    let published = publisher.finish()?;
    log::info!("Rendered {} files, published {}", written.len(), published);
    Ok(())
}
