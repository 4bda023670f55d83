//! Local cache: a synchronous key/value store that is always available.
//!
//! It is the write-through durability copy for every save and the first read
//! fallback when the remote backend is unreachable. Nothing here raises: I/O
//! failures are logged, malformed values read back as absent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{error, warn};

pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, raw: &str);
}

/// Reads and parses a cached value. A value that does not parse is treated as a miss.
pub fn read_json<T: DeserializeOwned>(cache: &dyn LocalCache, key: &str) -> Option<T> {
    let raw = cache.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "discarding malformed cached value");
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(cache: &dyn LocalCache, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, &raw),
        Err(e) => error!(key, error = %e, "could not serialize value for the local cache"),
    }
}

/// One `<key>.json` file per key under a directory.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            error!(dir = %dir.display(), error = %e, "could not create cache directory");
        }
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, raw: &str) {
        // Write then rename so a crash never leaves a half-written value behind.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        let result = fs::write(&tmp, raw).and_then(|_| fs::rename(&tmp, &path));
        if let Err(e) = result {
            error!(key, path = %path.display(), error = %e, "failed to write local cache entry");
        }
    }
}

/// In-process cache, used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, raw: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), raw.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("cache"));

        assert_eq!(cache.get("cats"), None);
        cache.set("cats", "[1]");
        cache.set("cats", "[1,2]");
        assert_eq!(cache.get("cats").as_deref(), Some("[1,2]"));
        assert!(dir.path().join("cache/cats.json").exists());
        assert!(!dir.path().join("cache/cats.json.tmp").exists());
    }

    #[test]
    fn malformed_value_reads_as_miss() {
        let cache = MemoryCache::new();
        cache.set("cats", "{not json");
        assert_eq!(read_json::<Vec<i64>>(&cache, "cats"), None);

        write_json(&cache, "cats", &vec![3, 4]);
        assert_eq!(read_json::<Vec<i64>>(&cache, "cats"), Some(vec![3, 4]));
    }
}
