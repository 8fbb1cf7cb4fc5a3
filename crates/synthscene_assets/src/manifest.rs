//! Asset manifests
//!
//! A manifest maps asset ids to metadata records. Sources either ship a
//! `manifest.json` or are indexed by listing their `*.tar.gz` archives.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::asset_error::AssetError;
use crate::remote::RemoteDir;

/// File name of the manifest inside an asset source
pub const MANIFEST_FILE: &str = "manifest.json";
/// Extension of asset archives
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Metadata for every asset of a source, keyed by id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetManifest {
    records: BTreeMap<String, Map<String, Value>>,
    from_file: bool,
}

impl AssetManifest {
    /// Load the manifest of `remote`, falling back to its archive listing
    pub fn load(remote: &RemoteDir) -> Result<Self, AssetError> {
        if remote.exists(MANIFEST_FILE)? {
            let text = remote.read_to_string(MANIFEST_FILE)?;
            let mut manifest = Self::from_json(&text)?;
            manifest.from_file = true;
            Ok(manifest)
        } else {
            let archives = remote.list_with_suffix(ARCHIVE_SUFFIX)?;
            Ok(Self::from_ids(
                archives
                    .iter()
                    .filter_map(|name| name.strip_suffix(ARCHIVE_SUFFIX)),
            ))
        }
    }

    /// Parse manifest JSON
    ///
    /// Accepts a list of records (`[{"id": "a", ...}]`) or the column layout
    /// (`{"id": {"0": "a"}, "mass": {"0": 1.0}}`).
    pub fn from_json(text: &str) -> Result<Self, AssetError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(rows) => Self::from_records(rows),
            Value::Object(columns) => Self::from_columns(columns),
            _ => Err(AssetError::Parse(
                "manifest must be a list of records or an object of columns".to_string(),
            )),
        }
    }

    /// Manifest with bare `id` records
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = ids
            .into_iter()
            .map(|id| {
                let id = id.into();
                let mut record = Map::new();
                record.insert("id".to_string(), Value::String(id.clone()));
                (id, record)
            })
            .collect();
        Self { records, from_file: false }
    }

    fn from_records(rows: Vec<Value>) -> Result<Self, AssetError> {
        let mut records = BTreeMap::new();
        for (i, row) in rows.into_iter().enumerate() {
            let Value::Object(record) = row else {
                return Err(AssetError::Parse(format!("manifest row {} is not an object", i)));
            };
            let id = record_id(&record)
                .ok_or_else(|| AssetError::Parse(format!("manifest row {} has no id", i)))?;
            insert_unique(&mut records, id, record)?;
        }
        Ok(Self { records, from_file: false })
    }

    fn from_columns(columns: Map<String, Value>) -> Result<Self, AssetError> {
        let ids = match columns.get("id") {
            Some(Value::Object(ids)) => ids,
            _ => return Err(AssetError::Parse("manifest has no id column".to_string())),
        };

        let mut records = BTreeMap::new();
        for (row, id) in ids {
            let id = value_as_id(id)
                .ok_or_else(|| AssetError::Parse(format!("manifest row {} has no id", row)))?;
            let mut record = Map::new();
            for (column, cells) in &columns {
                if let Some(cell) = cells.get(row.as_str()) {
                    record.insert(column.clone(), cell.clone());
                }
            }
            insert_unique(&mut records, id, record)?;
        }
        Ok(Self { records, from_file: false })
    }

    /// Whether the records came from a manifest file rather than a listing
    pub fn is_from_file(&self) -> bool {
        self.from_file
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Metadata record of `id`
    pub fn get(&self, id: &str) -> Option<&Map<String, Value>> {
        self.records.get(id)
    }

    /// All asset ids, sorted
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One record per id; a repeated id would hide a row
fn insert_unique(
    records: &mut BTreeMap<String, Map<String, Value>>,
    id: String,
    record: Map<String, Value>,
) -> Result<(), AssetError> {
    if records.contains_key(&id) {
        return Err(AssetError::Parse(format!("manifest lists asset '{}' more than once", id)));
    }
    records.insert(id, record);
    Ok(())
}

fn record_id(record: &Map<String, Value>) -> Option<String> {
    record.get("id").and_then(value_as_id)
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
