//! Remote asset directories
//!
//! An asset source lives either in a local directory or behind an HTTP(S)
//! base URL. Cloud storage URIs (`gs://bucket/path`) are served through the
//! public HTTPS endpoint.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::asset_error::AssetError;

const GCS_PREFIX: &str = "gs://";
const GCS_HTTPS_ENDPOINT: &str = "https://storage.googleapis.com/";

/// Location of the archives an asset source reads from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteDir {
    /// Directory on the local filesystem
    Local(PathBuf),
    /// Base URL, without trailing slash
    Http(String),
}

impl RemoteDir {
    /// Interpret a path or URI
    ///
    /// `http://` and `https://` URLs are used as-is, `gs://` URIs are mapped
    /// onto the storage HTTPS endpoint, everything else is a local path.
    pub fn parse(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix(GCS_PREFIX) {
            return RemoteDir::Http(format!("{}{}", GCS_HTTPS_ENDPOINT, rest.trim_end_matches('/')));
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return RemoteDir::Http(uri.trim_end_matches('/').to_string());
        }
        RemoteDir::Local(PathBuf::from(uri))
    }

    /// Last path component of the location
    pub fn name(&self) -> String {
        match self {
            RemoteDir::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            RemoteDir::Http(url) => url.rsplit('/').next().unwrap_or_default().to_string(),
        }
    }

    /// Whether this location is reached over the network
    pub fn is_remote(&self) -> bool {
        matches!(self, RemoteDir::Http(_))
    }

    /// Display form of a file inside this location
    pub fn join(&self, file: &str) -> String {
        match self {
            RemoteDir::Local(path) => path.join(file).display().to_string(),
            RemoteDir::Http(url) => format!("{}/{}", url, file),
        }
    }

    /// Whether `file` exists in this location
    pub fn exists(&self, file: &str) -> Result<bool, AssetError> {
        match self {
            RemoteDir::Local(path) => Ok(path.join(file).is_file()),
            RemoteDir::Http(_) => {
                let url = self.join(file);
                match ureq::head(&url).call() {
                    Ok(_) => Ok(true),
                    Err(ureq::Error::Status(404, _)) => Ok(false),
                    Err(e) => Err(AssetError::Network(format!("HEAD {}: {}", url, e))),
                }
            }
        }
    }

    /// Read `file` as UTF-8 text
    pub fn read_to_string(&self, file: &str) -> Result<String, AssetError> {
        let bytes = self.read_bytes(file)?;
        String::from_utf8(bytes)
            .map_err(|e| AssetError::Parse(format!("{} is not UTF-8: {}", self.join(file), e)))
    }

    /// Copy `file` from this location to `local_path`
    pub fn copy_to(&self, file: &str, local_path: &Path) -> Result<u64, AssetError> {
        match self {
            RemoteDir::Local(path) => {
                let src = path.join(file);
                fs::copy(&src, local_path).map_err(|e| not_found_or_io(e, &src))
            }
            RemoteDir::Http(_) => {
                let bytes = self.read_bytes(file)?;
                fs::write(local_path, &bytes)?;
                Ok(bytes.len() as u64)
            }
        }
    }

    /// File names in this location ending with `suffix`, sorted
    ///
    /// Only local directories can be listed; HTTP sources must ship a manifest.
    pub fn list_with_suffix(&self, suffix: &str) -> Result<Vec<String>, AssetError> {
        match self {
            RemoteDir::Local(path) => {
                let mut names = Vec::new();
                for entry in fs::read_dir(path).map_err(|e| not_found_or_io(e, path))? {
                    let name = entry?.file_name().to_string_lossy().into_owned();
                    if name.ends_with(suffix) {
                        names.push(name);
                    }
                }
                names.sort();
                Ok(names)
            }
            RemoteDir::Http(url) => Err(AssetError::NotFound(format!(
                "{}/manifest.json (HTTP sources cannot be listed)",
                url
            ))),
        }
    }

    fn read_bytes(&self, file: &str) -> Result<Vec<u8>, AssetError> {
        match self {
            RemoteDir::Local(path) => {
                let src = path.join(file);
                fs::read(&src).map_err(|e| not_found_or_io(e, &src))
            }
            RemoteDir::Http(_) => {
                let url = self.join(file);
                let response = ureq::get(&url).call().map_err(|e| match e {
                    ureq::Error::Status(404, _) => AssetError::NotFound(url.clone()),
                    e => AssetError::Network(format!("Failed to download {}: {}", url, e)),
                })?;

                let mut data = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut data)
                    .map_err(|e| AssetError::Network(format!("Failed to read {}: {}", url, e)))?;
                log::debug!("Downloaded {} bytes from {}", data.len(), url);
                Ok(data)
            }
        }
    }
}

impl fmt::Display for RemoteDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteDir::Local(path) => write!(f, "{}", path.display()),
            RemoteDir::Http(url) => write!(f, "{}", url),
        }
    }
}

fn not_found_or_io(err: io::Error, path: &Path) -> AssetError {
    if err.kind() == io::ErrorKind::NotFound {
        AssetError::NotFound(path.display().to_string())
    } else {
        AssetError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gcs_uri() {
        let dir = RemoteDir::parse("gs://kubric-public/ShapeNetCore.v2/");
        assert_eq!(
            dir,
            RemoteDir::Http("https://storage.googleapis.com/kubric-public/ShapeNetCore.v2".to_string())
        );
        assert_eq!(dir.name(), "ShapeNetCore.v2");
        assert!(dir.is_remote());
    }

    #[test]
    fn test_parse_http_and_local() {
        assert_eq!(
            RemoteDir::parse("https://example.com/assets/"),
            RemoteDir::Http("https://example.com/assets".to_string())
        );
        let local = RemoteDir::parse("/data/KLEVR");
        assert_eq!(local, RemoteDir::Local(PathBuf::from("/data/KLEVR")));
        assert_eq!(local.name(), "KLEVR");
        assert!(!local.is_remote());
    }

    #[test]
    fn test_http_join() {
        let dir = RemoteDir::parse("https://example.com/assets");
        assert_eq!(dir.join("cube.tar.gz"), "https://example.com/assets/cube.tar.gz");
    }

    #[test]
    fn test_http_cannot_list() {
        let dir = RemoteDir::parse("https://example.com/assets");
        assert!(matches!(dir.list_with_suffix(".tar.gz"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_local_operations() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.tar.gz"), b"b").unwrap();
        fs::write(dir.path().join("a.tar.gz"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let remote = RemoteDir::Local(dir.path().to_path_buf());
        assert!(remote.exists("notes.txt").unwrap());
        assert!(!remote.exists("missing.txt").unwrap());
        assert_eq!(remote.read_to_string("notes.txt").unwrap(), "hello");
        assert_eq!(
            remote.list_with_suffix(".tar.gz").unwrap(),
            vec!["a.tar.gz".to_string(), "b.tar.gz".to_string()]
        );

        let target = dir.path().join("copy.txt");
        assert_eq!(remote.copy_to("notes.txt", &target).unwrap(), 5);
        assert_eq!(fs::read_to_string(target).unwrap(), "hello");
    }

    #[test]
    fn test_local_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let remote = RemoteDir::Local(dir.path().to_path_buf());
        let target = dir.path().join("out");
        assert!(matches!(remote.copy_to("nope.tar.gz", &target), Err(AssetError::NotFound(_))));
        assert!(matches!(remote.read_to_string("nope.json"), Err(AssetError::NotFound(_))));
    }
}
