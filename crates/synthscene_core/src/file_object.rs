//! Objects backed by files from an asset archive

use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::physics::PhysicalProperties;

/// An asset instance: a collision description for the simulator (URDF) and a
/// visual geometry file for the renderer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileBasedObject {
    /// Identifier of the asset in its source manifest
    pub asset_id: String,
    /// File consumed by the physics simulator
    pub simulation_filename: PathBuf,
    /// File imported by the rendering backend
    pub render_filename: PathBuf,
    /// Physical properties
    #[serde(default)]
    pub physics: PhysicalProperties,
}

impl FileBasedObject {
    /// Create a file-based object with default physical properties
    pub fn new(
        asset_id: impl Into<String>,
        simulation_filename: impl Into<PathBuf>,
        render_filename: impl Into<PathBuf>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            simulation_filename: simulation_filename.into(),
            render_filename: render_filename.into(),
            physics: PhysicalProperties::default(),
        }
    }

    /// Set the physical properties
    pub fn with_physics(mut self, physics: PhysicalProperties) -> Self {
        self.physics = physics;
        self
    }

    /// Lowercase extension of the render file, if any
    pub fn render_format(&self) -> Option<String> {
        self.render_filename
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format() {
        let obj = FileBasedObject::new("chair", "chair/object.urdf", "chair/visual_geometry.OBJ");
        assert_eq!(obj.render_format().as_deref(), Some("obj"));

        let bare = FileBasedObject::new("x", "x/a.urdf", "x/mesh");
        assert!(bare.render_format().is_none());
    }
}
