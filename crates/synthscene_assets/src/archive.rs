//! Gzipped tar extraction

use std::fs::File;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::asset_error::AssetError;

/// Unpack `archive` into `dest` and return the member names in archive order
///
/// Entries that would land outside `dest` are skipped by the unpacker.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<Vec<String>, AssetError> {
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(file));
    let mut members = Vec::new();

    let entries = tar
        .entries()
        .map_err(|e| AssetError::Archive(format!("{}: {}", archive.display(), e)))?;
    for entry in entries {
        let mut entry =
            entry.map_err(|e| AssetError::Archive(format!("{}: {}", archive.display(), e)))?;
        let name = entry
            .path()
            .map_err(|e| AssetError::Archive(format!("{}: {}", archive.display(), e)))?
            .display()
            .to_string();
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| AssetError::Archive(format!("{}: {}: {}", archive.display(), name, e)))?;
        if unpacked {
            members.push(name);
        } else {
            log::warn!("Skipped archive member outside destination: {}", name);
        }
    }

    log::debug!("Extracted {:?}", members);
    Ok(members)
}
