//! Asset sources for SynthScene
//!
//! Assets are distributed as `<id>.tar.gz` archives next to an optional
//! `manifest.json`. Each archive unpacks to `<id>/data.json` plus the files
//! it references: a URDF for the simulator and a visual geometry for the
//! renderer.
//!
//! - [`AssetSource`] - Fetches, extracts and instantiates assets
//! - [`AssetManifest`] - Index of the ids a source provides
//! - [`RemoteDir`] - Local directory or HTTP(S) location of the archives
//! - [`AssetCache`] - Typed cache of parsed asset files

mod archive;
mod asset_cache;
mod asset_error;
mod asset_source;
mod manifest;
mod properties;
mod remote;

pub use archive::extract_tar_gz;
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use asset_error::AssetError;
pub use asset_source::{AssetSource, FetchedAsset};
pub use manifest::{AssetManifest, ARCHIVE_SUFFIX, MANIFEST_FILE};
pub use properties::{AssetPaths, AssetProperties, PROPERTIES_FILE};
pub use remote::RemoteDir;
