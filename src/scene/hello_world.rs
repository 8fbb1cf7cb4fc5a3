//! The hello-world shot: a small cube sliding over an invisible floor

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use synthscene_assets::{AssetError, AssetSource, RemoteDir};
use synthscene_core::{
    AnimatedProperty, BufferGeometry, Camera, Geometry, GeometryError, Material, Mesh, Object3D,
    PhysicalOverrides, Scene,
};
use synthscene_math::{Color, Quat, Vec3};

use super::SceneBuilder;
use crate::config::SceneConfig;

/// Optional parts of the hello-world scene
#[derive(Default)]
pub struct HelloWorldOptions<'a> {
    /// OBJ file shown next to the cube with a phong material: a local path,
    /// an `http(s)://` URL or a `gs://` URI
    pub mesh: Option<String>,
    /// Asset placed at the origin
    pub asset: Option<(&'a mut AssetSource, String)>,
}

/// Error assembling the hello-world scene
#[derive(Debug)]
pub enum HelloWorldError {
    Mesh(GeometryError),
    Asset(AssetError),
}

impl std::fmt::Display for HelloWorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HelloWorldError::Mesh(e) => write!(f, "{}", e),
            HelloWorldError::Asset(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HelloWorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HelloWorldError::Mesh(e) => Some(e),
            HelloWorldError::Asset(e) => Some(e),
        }
    }
}

impl From<GeometryError> for HelloWorldError {
    fn from(e: GeometryError) -> Self {
        HelloWorldError::Mesh(e)
    }
}

impl From<AssetError> for HelloWorldError {
    fn from(e: AssetError) -> Self {
        HelloWorldError::Asset(e)
    }
}

/// Build the hello-world scene
///
/// Frames 0 to 10 unless `config` says otherwise: an orthographic camera at
/// (2, 2, 2) aimed just above the origin, a dim ambient light, a sun, a cube
/// moving from (0, 0.2, 0.05) to (0, 0.5, 0.25) and a shadow-catching floor.
pub fn hello_world_scene(
    config: &SceneConfig,
    options: HelloWorldOptions<'_>,
) -> Result<Scene, HelloWorldError> {
    let mut cube = Object3D::new()
        .with_name("cube")
        .with_scale(Vec3::splat(0.1))
        .with_position((0.0, 0.2, 0.05));
    cube.keyframe_insert(AnimatedProperty::Position, 0);
    cube.transform.position = Vec3::new(0.0, 0.5, 0.25);
    cube.keyframe_insert(AnimatedProperty::Position, 10);

    let mut builder = SceneBuilder::from_config(config)
        .add_camera(
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(0.0, 0.0, 0.25),
            Camera::orthographic_bounds(-0.5, 0.5, 0.5, -0.5),
        )
        .add_ambient_light(Color::from_hex(0x030303))
        .add_directional_light(Vec3::new(0.5, -0.5, 2.0), Vec3::ZERO, Color::from_hex(0xFFFFFF), 2.0)
        .add_mesh(cube, Mesh::new(Geometry::Box, Material::flat(Color::WHITE)));

    if let Some(location) = &options.mesh {
        let geometry = load_mesh(location)?;
        log::info!(
            "Loaded {} vertices, {} faces from {}",
            geometry.vertices.len(),
            geometry.faces.len(),
            location
        );
        let spot = Object3D::new()
            .with_name("spot")
            .with_position((-0.14, 0.22, 0.0))
            .with_scale(Vec3::splat(0.5))
            .with_rotation(Quat::from_axis_angle(Vec3::X, FRAC_PI_2));
        builder = builder.add_mesh(spot, Mesh::new(Geometry::Buffer(geometry), Material::phong(Color::WHITE)));
    }

    if let Some((source, asset_id)) = options.asset {
        builder = builder.add_asset(source, &asset_id, Object3D::new(), PhysicalOverrides::new())?;
    }

    let floor = Object3D::new().with_name("floor").with_scale(Vec3::splat(2.0));
    builder = builder.add_mesh(floor, Mesh::new(Geometry::Plane, Material::shadow()));

    Ok(builder.build())
}

/// Load an OBJ mesh from a local path or a remote location
///
/// Remote files are downloaded into a temporary directory that is removed
/// once the geometry is parsed.
pub fn load_mesh(location: &str) -> Result<BufferGeometry, HelloWorldError> {
    let (dir, file) = location.rsplit_once('/').unwrap_or((".", location));
    let remote = RemoteDir::parse(dir);
    if !remote.is_remote() {
        return Ok(BufferGeometry::from_obj(Path::new(location))?);
    }

    let download = tempfile::Builder::new().prefix("mesh").tempdir().map_err(AssetError::from)?;
    let local = download.path().join(file);
    log::debug!("Downloading {} to {}", remote.join(file), local.display());
    remote.copy_to(file, &local)?;
    Ok(BufferGeometry::from_obj(&local)?)
}
