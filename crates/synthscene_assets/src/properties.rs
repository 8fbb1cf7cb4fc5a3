//! Per-asset property files (`<id>/data.json`)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use synthscene_core::PhysicalOverrides;
use synthscene_math::Aabb;

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// File name of the property file inside an extracted asset
pub const PROPERTIES_FILE: &str = "data.json";

/// Relative paths of the files making up an asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetPaths {
    pub visual_geometry: Vec<String>,
    pub urdf: Vec<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Contents of an asset's property file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetProperties {
    pub paths: AssetPaths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restitution: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Aabb>,
    /// Keys not interpreted by the toolkit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetProperties {
    /// Parse a property file's JSON
    pub fn from_json(text: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(text)?)
    }

    /// First visual geometry file, relative to the asset directory
    pub fn visual_geometry(&self) -> Result<&str, AssetError> {
        first(&self.paths.visual_geometry, "visual_geometry")
    }

    /// First URDF file, relative to the asset directory
    pub fn urdf(&self) -> Result<&str, AssetError> {
        first(&self.paths.urdf, "urdf")
    }

    /// Physical values shipped with the asset
    pub fn physical_defaults(&self) -> PhysicalOverrides {
        PhysicalOverrides {
            mass: self.mass,
            friction: self.friction,
            restitution: self.restitution,
            bounds: self.bounds,
        }
    }
}

impl Asset for AssetProperties {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path)?;
        let properties = Self::from_json(&text)?;
        log::debug!("Loaded properties {:?}", properties);
        Ok(properties)
    }
}

fn first<'a>(paths: &'a [String], key: &str) -> Result<&'a str, AssetError> {
    paths
        .first()
        .map(String::as_str)
        .ok_or_else(|| AssetError::Parse(format!("paths.{} is empty", key)))
}
