//! Errors raised while locating, downloading, unpacking or parsing assets

use std::io;
use std::fmt;

#[derive(Debug)]
pub enum AssetError {
    Io(io::Error),
    /// Parse error (malformed manifest or property file)
    Parse(String),
    /// A required remote or local file does not exist
    NotFound(String),
    /// HTTP request failed
    Network(String),
    /// Archive could not be unpacked
    Archive(String),
    /// Asset id is not listed in the source's manifest
    UnknownAsset(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Parse(msg) => write!(f, "Asset parse error: {}", msg),
            AssetError::NotFound(path) => write!(f, "Asset not found: {}", path),
            AssetError::Network(msg) => write!(f, "Asset network error: {}", msg),
            AssetError::Archive(msg) => write!(f, "Asset archive error: {}", msg),
            AssetError::UnknownAsset(id) => write!(f, "Unknown asset id: {}", id),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        AssetError::Parse(err.to_string())
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Parse(msg)
    }
}

impl From<&str> for AssetError {
    fn from(msg: &str) -> Self {
        AssetError::Parse(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_messages_name_the_asset() {
        assert_eq!(
            AssetError::UnknownAsset("chair_042".to_string()).to_string(),
            "Unknown asset id: chair_042"
        );
        assert_eq!(
            AssetError::NotFound("KuBasic/cube.tar.gz".to_string()).to_string(),
            "Asset not found: KuBasic/cube.tar.gz"
        );
    }

    #[test]
    fn test_io_errors_keep_their_source() {
        let err: AssetError = io::Error::new(io::ErrorKind::PermissionDenied, "scratch is read-only").into();
        assert!(err.to_string().contains("scratch is read-only"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "scratch is read-only");
        assert!(AssetError::Network("timed out".to_string()).source().is_none());
    }

    #[test]
    fn test_conversions_to_parse_errors() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{\"paths\": ").unwrap_err();
        assert!(matches!(AssetError::from(bad_json), AssetError::Parse(_)));
        assert!(matches!(AssetError::from("empty urdf list"), AssetError::Parse(m) if m == "empty urdf list"));
        assert!(matches!(AssetError::from(String::from("x")), AssetError::Parse(_)));
    }
}
