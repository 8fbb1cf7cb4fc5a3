//! Scene graph container and serialization
//!
//! A [`Scene`] owns every camera, light, mesh and asset object of a shot,
//! plus the frame range the backend renders. Scenes can be saved to and
//! loaded from RON files.

use serde::{Serialize, Deserialize};
use slotmap::{new_key_type, SlotMap};
use std::path::Path;
use std::fs;
use std::io;

use synthscene_math::Color;

use crate::camera::Camera;
use crate::file_object::FileBasedObject;
use crate::light::Light;
use crate::mesh::Mesh;
use crate::object::Object3D;

new_key_type! {
    /// Key to an object in a scene
    ///
    /// Uses generational indexing: if an object is removed and its slot
    /// reused, old keys return None instead of pointing to the new object.
    pub struct ObjectKey;
}

/// What kind of object a [`SceneObject`] is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Camera(Camera),
    Light(Light),
    Mesh(Mesh),
    FileBased(FileBasedObject),
}

impl ObjectKind {
    /// Short name of the kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectKind::Camera(_) => "camera",
            ObjectKind::Light(_) => "light",
            ObjectKind::Mesh(_) => "mesh",
            ObjectKind::FileBased(_) => "asset",
        }
    }
}

/// An object placed in a scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Name, transform and keyframes
    pub object: Object3D,
    /// Kind-specific data
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn camera(object: Object3D, camera: Camera) -> Self {
        Self { object, kind: ObjectKind::Camera(camera) }
    }

    pub fn light(object: Object3D, light: Light) -> Self {
        Self { object, kind: ObjectKind::Light(light) }
    }

    pub fn mesh(object: Object3D, mesh: Mesh) -> Self {
        Self { object, kind: ObjectKind::Mesh(mesh) }
    }

    /// Place an asset object; unnamed objects take the asset id as name
    pub fn file_based(object: Object3D, file_object: FileBasedObject) -> Self {
        let object = if object.name.is_none() {
            object.with_name(file_object.asset_id.clone())
        } else {
            object
        };
        Self { object, kind: ObjectKind::FileBased(file_object) }
    }

    /// Name of the object, if any
    pub fn name(&self) -> Option<&str> {
        self.object.name.as_deref()
    }

    /// Camera data if this is a camera
    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            ObjectKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Light data if this is a light
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Asset data if this is a file-based object
    pub fn as_file_based(&self) -> Option<&FileBasedObject> {
        match &self.kind {
            ObjectKind::FileBased(obj) => Some(obj),
            _ => None,
        }
    }
}

/// A scene: objects plus the animation range to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Shot name, also used in metadata and as asset dependent
    pub name: String,
    /// First frame of the animation (inclusive)
    pub frame_start: i32,
    /// Last frame of the animation (inclusive)
    pub frame_end: i32,
    /// Frames per second
    pub frame_rate: u32,
    /// All objects in the scene
    objects: SlotMap<ObjectKey, SceneObject>,
    /// Camera the scene is rendered from
    #[serde(default)]
    pub camera: Option<ObjectKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("scene")
    }
}

impl Scene {
    /// Create a new empty scene spanning frames 1 to 48 at 24 fps
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_start: 1,
            frame_end: 48,
            frame_rate: 24,
            objects: SlotMap::with_key(),
            camera: None,
        }
    }

    /// Set the inclusive frame range
    pub fn with_frame_range(mut self, start: i32, end: i32) -> Self {
        self.frame_start = start;
        self.frame_end = end;
        self
    }

    /// Set the frame rate
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Number of frames in the range, 0 if the range is inverted
    pub fn frame_count(&self) -> usize {
        if self.frame_end < self.frame_start {
            0
        } else {
            (self.frame_end - self.frame_start + 1) as usize
        }
    }

    /// Add an object, returning its key
    pub fn add(&mut self, object: SceneObject) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Remove an object; removing the active camera unsets it
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        if self.camera == Some(key) {
            self.camera = None;
        }
        self.objects.remove(key)
    }

    /// Get an object by key
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Get a mutable object by key
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Find the first object with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(ObjectKey, &SceneObject)> {
        self.objects.iter().find(|(_, obj)| obj.name() == Some(name))
    }

    /// Whether the key refers to a live object
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Iterate over keys and objects
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    /// Number of objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Designate the camera the scene is rendered from
    pub fn set_camera(&mut self, key: ObjectKey) {
        self.camera = Some(key);
    }

    /// The active camera object and its data, if set and valid
    pub fn active_camera(&self) -> Option<(&SceneObject, &Camera)> {
        let obj = self.objects.get(self.camera?)?;
        obj.as_camera().map(|camera| (obj, camera))
    }

    /// Sum of all ambient light colors (black without ambient lights)
    pub fn ambient_illumination(&self) -> Color {
        self.objects
            .values()
            .filter_map(|obj| match obj.as_light() {
                Some(Light::Ambient { color }) => Some(*color),
                _ => None,
            })
            .fold(Color::BLACK, |acc, c| acc.add_rgb(&c))
    }

    /// Read a scene saved with [`save`](Self::save)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Write the scene as pretty RON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let config = ron::ser::PrettyConfig::new().struct_names(true);
        fs::write(path, ron::ser::to_string_pretty(self, config)?)?;
        Ok(())
    }
}

/// A scene file could not be read back
#[derive(Debug)]
pub enum SceneLoadError {
    Io(io::Error),
    /// Not a valid RON scene
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "Cannot read scene file: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Invalid scene file: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(e) => Some(e),
            SceneLoadError::Parse(e) => Some(e),
        }
    }
}

/// A scene could not be written out
#[derive(Debug)]
pub enum SceneSaveError {
    Io(io::Error),
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "Cannot write scene file: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Cannot serialize scene: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneSaveError::Io(e) => Some(e),
            SceneSaveError::Serialize(e) => Some(e),
        }
    }
}
