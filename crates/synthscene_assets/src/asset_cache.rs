//! Parsed asset files kept in memory
//!
//! Archives are extracted to disk once per source; what gets parsed out of
//! them (the property files) lives here, so placing the same asset many
//! times reads its files once.
//!
//! Entries are keyed by file path. Each one records the scenes using it;
//! [`AssetCache::gc`] drops entries no scene uses any more.
//!
//! ```ignore
//! let handle = cache.load::<AssetProperties>(scratch.join("chair/data.json"))?;
//! cache.add_dependent(&handle, "kitchen");
//! let props = cache.get::<AssetProperties>(&handle);
//! ```

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Cache-wide id of a loaded file. Ids start at 1 and are never reused.
pub type AssetId = u64;

/// Refers to one cached file
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// File the data was parsed from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Data parsed from a single file
pub trait Asset: Sized + Send + Sync + 'static {
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

struct Entry {
    handle: AssetHandle,
    data: Arc<dyn Any + Send + Sync>,
    /// Scene names
    dependents: BTreeSet<String>,
}

/// Type-erased, path-deduplicated store of parsed files
#[derive(Default)]
pub struct AssetCache {
    entries: BTreeMap<AssetId, Entry>,
    ids_by_path: HashMap<PathBuf, AssetId>,
    last_id: AssetId,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path` as `T` unless it is already cached
    ///
    /// A cached path is never re-read, whatever type was asked for.
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref();
        if let Some(handle) = self.handle_for(path) {
            return Ok(handle);
        }

        let data: Arc<dyn Any + Send + Sync> = Arc::new(T::load_from_file(path)?);
        self.last_id += 1;
        let handle = AssetHandle {
            id: self.last_id,
            path: path.to_path_buf(),
        };
        self.ids_by_path.insert(handle.path.clone(), handle.id);
        self.entries.insert(
            handle.id,
            Entry {
                handle: handle.clone(),
                data,
                dependents: BTreeSet::new(),
            },
        );
        Ok(handle)
    }

    /// [`load`](Self::load) followed by [`get`](Self::get)
    pub fn load_data<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<Arc<T>, AssetError> {
        let handle = self.load::<T>(path)?;
        self.get::<T>(&handle).ok_or_else(|| {
            AssetError::Parse(format!(
                "{} is cached with a different asset type",
                handle.path.display()
            ))
        })
    }

    /// Data behind `handle`, `None` if it was collected or has another type
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.entries.get(&handle.id)?;
        Arc::clone(&entry.data).downcast::<T>().ok()
    }

    /// Record that scene `scene_name` uses the file
    pub fn add_dependent(&mut self, handle: &AssetHandle, scene_name: &str) {
        if let Some(entry) = self.entries.get_mut(&handle.id) {
            entry.dependents.insert(scene_name.to_string());
        }
    }

    pub fn remove_dependent(&mut self, handle: &AssetHandle, scene_name: &str) {
        if let Some(entry) = self.entries.get_mut(&handle.id) {
            entry.dependents.remove(scene_name);
        }
    }

    /// Drop every entry without dependents, returning how many went
    pub fn gc(&mut self) -> usize {
        let before = self.entries.len();
        let ids_by_path = &mut self.ids_by_path;
        self.entries.retain(|_, entry| {
            let used = !entry.dependents.is_empty();
            if !used {
                ids_by_path.remove(&entry.handle.path);
            }
            used
        });
        let collected = before - self.entries.len();
        if collected > 0 {
            log::debug!("Collected {} unused asset files", collected);
        }
        collected
    }

    pub fn asset_count(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.entries.contains_key(&handle.id)
    }

    /// Handle of the entry parsed from `path`
    pub fn handle_for(&self, path: impl AsRef<Path>) -> Option<AssetHandle> {
        let id = self.ids_by_path.get(path.as_ref())?;
        self.entries.get(id).map(|entry| entry.handle.clone())
    }

    /// Scenes using the file, sorted by name
    pub fn dependents(&self, handle: &AssetHandle) -> Option<Vec<&str>> {
        self.entries
            .get(&handle.id)
            .map(|entry| entry.dependents.iter().map(String::as_str).collect())
    }
}
