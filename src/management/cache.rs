use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use crate::{
    types::{CacheFile, TrackExtras},
    warning,
};

/// Schema version of the persisted cache. Increment after any change to
/// the `TrackExtras` shape; a mismatch on load discards the whole file.
pub const CACHE_VERSION: u32 = 2;

#[derive(Debug)]
pub enum CacheError {
    IoError(Error),
    SerdeError(serde_json::Error),
    VersionMismatch(u32),
}

impl From<Error> for CacheError {
    fn from(err: Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerdeError(err)
    }
}

/// Persistent key -> extras mapping with FIFO eviction.
///
/// Durability is an optimization only: a cache that fails to load starts
/// empty and a failed save is logged and swallowed, because the resolver
/// can always recompute an entry on a miss. Single-writer, single-reader
/// within one process; nothing guards against concurrent processes.
pub struct CacheManager {
    path: PathBuf,
    capacity: usize,
    entries: Vec<(String, TrackExtras)>,
}

impl CacheManager {
    /// Loads the cache at `path`, never failing the caller. A missing
    /// file, a parse error, or a schema version mismatch all yield an
    /// empty cache at the current version.
    pub async fn load(path: PathBuf, capacity: usize) -> Self {
        let entries = match Self::read_entries(&path).await {
            Ok(entries) => entries,
            Err(CacheError::VersionMismatch(found)) => {
                warning!(
                    "Extras cache schema v{} does not match v{}, discarding it",
                    found,
                    CACHE_VERSION
                );
                Vec::new()
            }
            Err(CacheError::IoError(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warning!("Failed to load extras cache, starting empty: {:?}", e);
                Vec::new()
            }
        };

        Self {
            path,
            capacity,
            entries,
        }
    }

    async fn read_entries(path: &Path) -> Result<Vec<(String, TrackExtras)>, CacheError> {
        let content = async_fs::read_to_string(path).await?;
        let file: CacheFile = serde_json::from_str(&content)?;
        if file.version != CACHE_VERSION {
            return Err(CacheError::VersionMismatch(file.version));
        }
        Ok(file.entries)
    }

    pub fn get(&self, key: &str) -> Option<TrackExtras> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Inserts or replaces an entry, evicting the oldest-inserted entries
    /// beyond capacity, then persists best-effort.
    pub async fn put(&mut self, key: String, value: TrackExtras) {
        self.entries.retain(|(k, _)| k != &key);
        self.entries.push((key, value));
        while self.entries.len() > self.capacity {
            self.entries.remove(0);
        }

        if let Err(e) = self.save().await {
            warning!("Failed to persist extras cache: {:?}", e);
        }
    }

    pub async fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Drops all entries and removes the backing file.
    pub async fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::IoError(e)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
