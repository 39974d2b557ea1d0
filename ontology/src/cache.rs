//! Artifact caches for [`GraphIndex`](crate::GraphIndex) tables.
//!
//! Every derived table is stored under a logical name (see [`ArtifactKey`])
//! as a JSON blob. The index only ever talks to the [`ArtifactCache`] trait,
//! so the persistence backend is chosen by the caller.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::CacheError;

/// Key-value store for serialized index artifacts.
pub trait ArtifactCache: Send + Sync {
    /// Returns the bytes stored under `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the backend cannot be read.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `bytes` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the backend cannot be written.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CacheError>;

    /// Removes every stored artifact.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the backend cannot be cleared.
    fn clear(&self) -> Result<(), CacheError>;
}

/// Reads and decodes the artifact stored under `name`.
///
/// # Errors
///
/// Returns [`CacheError::Decode`] if the stored bytes are not a JSON
/// encoding of `T`, or any backend error from [`ArtifactCache::read`].
pub fn load<T: DeserializeOwned>(
    cache: &dyn ArtifactCache,
    name: &str,
) -> Result<Option<T>, CacheError> {
    match cache.read(name)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Decode {
                name: name.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `name`.
///
/// # Errors
///
/// Returns [`CacheError::Encode`] if `value` cannot be serialized, or any
/// backend error from [`ArtifactCache::write`].
pub fn store<T: Serialize + ?Sized>(
    cache: &dyn ArtifactCache,
    name: &str,
    value: &T,
) -> Result<(), CacheError> {
    let bytes = serde_json::to_vec(value).map_err(|source| CacheError::Encode {
        name: name.to_string(),
        source,
    })?;
    cache.write(name, &bytes)
}

/// Logical names of the tables the index derives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKey {
    /// Every individual in the graph.
    Individuals,
    /// Individual → most specific class label.
    TypeMap,
    /// Direct subclasses of a class.
    ClassesUnder(String),
    /// Two-level subclass → parent map under a class.
    SubclassParents(String),
    /// Direct `rdf:type` members of a class.
    Members(String),
    /// Labels of every declared data property.
    DataProperties,
    /// Boolean assertions of one data property.
    DataPropertyValues(String),
}

impl ArtifactKey {
    /// The name the artifact is stored under, e.g. `classes_under.Atom`.
    ///
    /// Characters outside `[A-Za-z0-9_.-]` are replaced with `_` so names
    /// are safe to use as file stems.
    #[must_use]
    pub fn name(&self) -> String {
        let raw = match self {
            ArtifactKey::Individuals => "individuals".to_string(),
            ArtifactKey::TypeMap => "type_map".to_string(),
            ArtifactKey::ClassesUnder(class) => format!("classes_under.{class}"),
            ArtifactKey::SubclassParents(class) => format!("subclass_parents.{class}"),
            ArtifactKey::Members(class) => format!("members.{class}"),
            ArtifactKey::DataProperties => "data_properties".to_string(),
            ArtifactKey::DataPropertyValues(prop) => format!("data_property_values.{prop}"),
        };
        raw.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Process-local cache backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactCache for MemoryCache {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(name).cloned())
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Cache that stores nothing. Every table is recomputed per process.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ArtifactCache for NoCache {
    fn read(&self, _name: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn write(&self, _name: &str, _bytes: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Directory of `<name>.json` files, one per artifact.
#[derive(Debug, Clone)]
pub struct JsonDirCache {
    dir: PathBuf,
}

impl JsonDirCache {
    /// Opens (and creates if needed) a cache rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Root directory of the cache.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ArtifactCache for JsonDirCache {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(name);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(artifact = name, "cache hit");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(name);
        fs::write(&path, bytes).map_err(|source| CacheError::Io { path, source })
    }

    fn clear(&self) -> Result<(), CacheError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| CacheError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|source| CacheError::Io { path, source })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn artifact_names_are_file_safe() {
        assert_eq!(ArtifactKey::TypeMap.name(), "type_map");
        assert_eq!(
            ArtifactKey::ClassesUnder("Atom".into()).name(),
            "classes_under.Atom"
        );
        assert_eq!(
            ArtifactKey::Members("Carbon-22".into()).name(),
            "members.Carbon-22"
        );
        assert_eq!(
            ArtifactKey::DataPropertyValues("a/b c".into()).name(),
            "data_property_values.a_b_c"
        );
    }

    #[test]
    fn memory_cache_round_trips() {
        let cache = MemoryCache::new();
        let mut table = BTreeMap::new();
        table.insert("d1".to_string(), "Compound".to_string());
        store(&cache, "type_map", &table).unwrap();
        let back: Option<BTreeMap<String, String>> = load(&cache, "type_map").unwrap();
        assert_eq!(back, Some(table));
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn no_cache_never_hits() {
        store(&NoCache, "individuals", &vec!["d1"]).unwrap();
        let back: Option<Vec<String>> = load(&NoCache, "individuals").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn corrupt_artifact_is_decode_error() {
        let cache = MemoryCache::new();
        cache.write("individuals", b"not json").unwrap();
        let err = load::<Vec<String>>(&cache, "individuals").unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));
    }
}
