//! Asset sources
//!
//! An [`AssetSource`] turns asset ids into [`FileBasedObject`]s. Archives are
//! copied from the source location into a private scratch directory and
//! unpacked there the first time an id is requested; later requests reuse
//! the extracted files and the cached property file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use synthscene_core::{FileBasedObject, PhysicalOverrides};
use tempfile::TempDir;

use crate::archive::extract_tar_gz;
use crate::asset_cache::{AssetCache, AssetHandle};
use crate::asset_error::AssetError;
use crate::manifest::{AssetManifest, ARCHIVE_SUFFIX};
use crate::properties::{AssetProperties, PROPERTIES_FILE};
use crate::remote::RemoteDir;

/// Local files of an extracted asset
#[derive(Clone, Debug)]
pub struct FetchedAsset {
    /// Cache handle of the parsed property file
    pub handle: AssetHandle,
    /// URDF consumed by the simulator
    pub simulation_path: PathBuf,
    /// Visual geometry imported by the renderer
    pub render_path: PathBuf,
    pub properties: Arc<AssetProperties>,
}

/// A collection of assets stored as `<id>.tar.gz` archives
pub struct AssetSource {
    name: String,
    remote: RemoteDir,
    local_dir: TempDir,
    manifest: AssetManifest,
    cache: AssetCache,
}

impl AssetSource {
    /// Open the source at `path` (local directory, `http(s)://` or `gs://`)
    ///
    /// Extracted assets go to a fresh directory prefixed `assets`, created in
    /// `scratch_dir` or the system temp directory. It is removed when the
    /// source is dropped.
    pub fn new(path: &str, scratch_dir: Option<&Path>) -> Result<Self, AssetError> {
        let remote = RemoteDir::parse(path);
        let name = remote.name();
        log::info!("Adding AssetSource '{}' with URI='{}'", name, remote);

        let mut builder = tempfile::Builder::new();
        builder.prefix("assets");
        let local_dir = match scratch_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempdir_in(dir)?
            }
            None => builder.tempdir()?,
        };

        let manifest = AssetManifest::load(&remote)?;
        if manifest.is_from_file() {
            log::info!(
                "Found manifest file. Loaded information about {} assets",
                manifest.len()
            );
        } else {
            log::info!("No manifest file. Found {} assets.", manifest.len());
        }

        Ok(Self {
            name,
            remote,
            local_dir,
            manifest,
            cache: AssetCache::new(),
        })
    }

    /// Instantiate asset `asset_id`
    ///
    /// Mass, friction, restitution and bounds come from `overrides` where set,
    /// otherwise from the asset's property file, otherwise from the defaults.
    pub fn create(
        &mut self,
        asset_id: &str,
        overrides: PhysicalOverrides,
    ) -> Result<FileBasedObject, AssetError> {
        if !self.manifest.contains(asset_id) {
            return Err(AssetError::UnknownAsset(asset_id.to_string()));
        }
        let fetched = self.fetch(asset_id)?;
        let physics = overrides.or(fetched.properties.physical_defaults()).resolve();

        Ok(FileBasedObject::new(asset_id, fetched.simulation_path, fetched.render_path)
            .with_physics(physics))
    }

    /// Make the files of `asset_id` available locally
    pub fn fetch(&mut self, asset_id: &str) -> Result<FetchedAsset, AssetError> {
        let archive_name = format!("{}{}", asset_id, ARCHIVE_SUFFIX);
        let local_archive = self.local_dir.path().join(&archive_name);

        if !local_archive.exists() {
            log::debug!(
                "Copying {} to {}",
                self.remote.join(&archive_name),
                local_archive.display()
            );
            // Only a fully extracted archive marks the asset as fetched
            let partial = self.local_dir.path().join(format!("{}.part", archive_name));
            let unpacked = self
                .remote
                .copy_to(&archive_name, &partial)
                .and_then(|_| extract_tar_gz(&partial, self.local_dir.path()));
            if let Err(e) = unpacked {
                if partial.exists() {
                    std::fs::remove_file(&partial)?;
                }
                return Err(e);
            }
            std::fs::rename(&partial, &local_archive)?;
        }

        let asset_dir = self.local_dir.path().join(asset_id);
        let properties_path = asset_dir.join(PROPERTIES_FILE);
        let handle = self.cache.load::<AssetProperties>(&properties_path)?;
        let properties = self.cache.load_data::<AssetProperties>(&properties_path)?;

        Ok(FetchedAsset {
            handle,
            simulation_path: asset_dir.join(properties.urdf()?),
            render_path: asset_dir.join(properties.visual_geometry()?),
            properties,
        })
    }

    /// Last path component of the source location
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remote(&self) -> &RemoteDir {
        &self.remote
    }

    /// Scratch directory holding downloaded and extracted archives
    pub fn local_dir(&self) -> &Path {
        self.local_dir.path()
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Parsed property files
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut AssetCache {
        &mut self.cache
    }
}
