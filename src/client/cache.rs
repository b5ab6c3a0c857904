// Genre table cache
// One serialized entry under a fixed key, no expiry; overwritten on refetch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::GenreTable;

pub const GENRE_CACHE_KEY: &str = "tmdb_genres";

/// Raw string storage for the cached genre table.
pub trait GenreCache: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, value: String);
    fn invalidate(&self);
}

/// In-process cache, lost on exit
#[derive(Debug, Default)]
pub struct MemoryGenreCache {
    entry: Mutex<Option<String>>,
}

impl MemoryGenreCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GenreCache for MemoryGenreCache {
    fn get(&self) -> Option<String> {
        self.entry.lock().ok().and_then(|entry| entry.clone())
    }

    fn set(&self, value: String) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = Some(value);
        }
    }

    fn invalidate(&self) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = None;
        }
    }
}

/// File-backed cache at `<dir>/tmdb_genres.json`
#[derive(Debug, Clone)]
pub struct FileGenreCache {
    path: PathBuf,
}

impl FileGenreCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", GENRE_CACHE_KEY)),
        }
    }

    /// Cache under `<data_dir>/cache`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(&data_dir.join("cache"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GenreCache for FileGenreCache {
    fn get(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn set(&self, value: String) {
        let result = self
            .path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(&self.path, value));
        if let Err(e) = result {
            tracing::warn!("Failed to write genre cache {:?}: {}", self.path, e);
        }
    }

    fn invalidate(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!("Failed to remove genre cache {:?}: {}", self.path, e);
            }
        }
    }
}

/// Read and parse the cached table. A corrupted entry is dropped and
/// reported as a miss.
pub fn load_table(cache: &dyn GenreCache) -> Option<GenreTable> {
    let raw = cache.get()?;
    match serde_json::from_str(&raw) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::debug!("Discarding unreadable genre cache: {}", e);
            cache.invalidate();
            None
        }
    }
}

pub fn store_table(cache: &dyn GenreCache, table: &GenreTable) {
    match serde_json::to_string(table) {
        Ok(raw) => cache.set(raw),
        Err(e) => tracing::warn!("Failed to serialize genre table: {}", e),
    }
}
