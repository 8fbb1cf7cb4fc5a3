//! Ground-truth metadata written next to rendered outputs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use synthscene_core::{Camera, ObjectKind, PhysicalProperties, SceneObject};

use crate::renderer::{RenderError, RenderJob};

/// Per-frame pose of an object, sampled from its keyframes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub positions: Vec<[f32; 3]>,
    /// Quaternions as `[w, x, y, z]`
    pub quaternions: Vec<[f32; 4]>,
    pub scales: Vec<[f32; 3]>,
}

impl Trajectory {
    fn sample(object: &SceneObject, frame_start: i32, frame_end: i32) -> Self {
        let mut trajectory = Trajectory::default();
        for frame in frame_start..=frame_end {
            let transform = object.object.transform_at(frame);
            trajectory.positions.push(transform.position.to_array());
            trajectory.quaternions.push(transform.rotation.to_blender());
            trajectory.scales.push(transform.scale.to_array());
        }
        trajectory
    }
}

/// Camera intrinsics and motion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraAnnotation {
    pub name: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_width: Option<f32>,
    /// Horizontal field of view in radians
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthographic_scale: Option<f32>,
    #[serde(flatten)]
    pub trajectory: Trajectory,
}

/// A mesh or asset object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    pub name: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physics: Option<PhysicalProperties>,
    #[serde(flatten)]
    pub trajectory: Trajectory,
}

/// Contents of `<output>_metadata.json`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneAnnotations {
    pub scene: String,
    /// `[width, height]` in pixels
    pub resolution: [u32; 2],
    pub frame_start: i32,
    pub frame_end: i32,
    pub frame_rate: u32,
    pub camera: CameraAnnotation,
    pub objects: Vec<ObjectAnnotation>,
}

impl SceneAnnotations {
    /// Collect annotations for the scene of `job`
    pub fn from_job(job: &RenderJob<'_>) -> Result<Self, RenderError> {
        let scene = job.scene;
        let (camera_object, camera) = scene.active_camera().ok_or(RenderError::MissingCamera)?;

        let (focal_length, sensor_width, orthographic_scale) = match *camera {
            Camera::Perspective { focal_length, sensor_width } => {
                (Some(focal_length), Some(sensor_width), None)
            }
            Camera::Orthographic { orthographic_scale } => (None, None, Some(orthographic_scale)),
            Camera::Undefined => (None, None, None),
        };

        let camera = CameraAnnotation {
            name: camera_object.name().map(str::to_string),
            kind: camera.kind_name().to_string(),
            focal_length,
            sensor_width,
            field_of_view: camera.field_of_view(),
            orthographic_scale,
            trajectory: Trajectory::sample(camera_object, scene.frame_start, scene.frame_end),
        };

        let objects = scene
            .iter()
            .filter_map(|(_, object)| {
                let (asset_id, physics) = match &object.kind {
                    ObjectKind::Mesh(_) => (None, None),
                    ObjectKind::FileBased(file) => (Some(file.asset_id.clone()), Some(file.physics)),
                    ObjectKind::Camera(_) | ObjectKind::Light(_) => return None,
                };
                Some(ObjectAnnotation {
                    name: object.name().map(str::to_string),
                    kind: object.kind.kind_name().to_string(),
                    asset_id,
                    physics,
                    trajectory: Trajectory::sample(object, scene.frame_start, scene.frame_end),
                })
            })
            .collect();

        Ok(Self {
            scene: scene.name.clone(),
            resolution: [job.width, job.height],
            frame_start: scene.frame_start,
            frame_end: scene.frame_end,
            frame_rate: scene.frame_rate,
            camera,
            objects,
        })
    }

    /// Write as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<(), RenderError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| RenderError::Annotation(format!("{}: {}", path.display(), e)))
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
