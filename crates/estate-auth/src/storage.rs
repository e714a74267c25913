// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Durable key-value storage behind the session store.
//!
//! The session persists two string entries, [`TOKEN_KEY`] and
//! [`USER_ID_KEY`]. Backends are synchronous; the store calls them while
//! holding its write lock.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the account identifier.
pub const USER_ID_KEY: &str = "userId";

// =============================================================================
// StorageError
// =============================================================================

/// Session persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("Session storage I/O error at {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The backing file exists but does not hold a JSON object of strings.
    #[error("Session storage at {path} is corrupt: {message}")]
    Corrupt {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The backend refused the operation.
    #[error("Session storage unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl StorageError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt-file error.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            StorageError::Io { .. } => "io",
            StorageError::Corrupt { .. } => "corrupt",
            StorageError::Unavailable { .. } => "unavailable",
        }
    }
}

// =============================================================================
// SessionStorage
// =============================================================================

/// A durable string key-value store.
pub trait SessionStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns a short backend name for logging.
    fn backend(&self) -> &'static str {
        "custom"
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory storage pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a JSON object file.
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename, so a crash never leaves a half-written session behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a file storage at the given path. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::corrupt(&self.path, e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::corrupt(&self.path, e.to_string()))?;

        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;

        debug!(path = %self.path.display(), entries = entries.len(), "Session file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let (mut entries, corrupt) = match self.read_entries() {
            Ok(entries) => (entries, false),
            // A corrupt file holds no usable session; replace it.
            Err(StorageError::Corrupt { .. }) => (BTreeMap::new(), true),
            Err(e) => return Err(e),
        };
        if entries.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.write_entries(&entries)
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| StorageError::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load(TOKEN_KEY).unwrap(), None);

        storage.store(TOKEN_KEY, "a.b.c").unwrap();
        assert_eq!(storage.load(TOKEN_KEY).unwrap().as_deref(), Some("a.b.c"));

        storage.remove(TOKEN_KEY).unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileStorage::new(&path);

        assert_eq!(storage.load(TOKEN_KEY).unwrap(), None);

        storage.store(TOKEN_KEY, "a.b.c").unwrap();
        storage.store(USER_ID_KEY, "u1").unwrap();
        assert!(path.exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.load(TOKEN_KEY).unwrap().as_deref(), Some("a.b.c"));
        assert_eq!(reopened.load(USER_ID_KEY).unwrap().as_deref(), Some("u1"));

        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.load(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.load(USER_ID_KEY).unwrap().as_deref(), Some("u1"));
    }

    #[test]
    fn test_file_storage_remove_without_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::new(&path);

        storage.remove(TOKEN_KEY).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_storage_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        let err = storage.load(TOKEN_KEY).unwrap_err();
        assert_eq!(err.error_type(), "corrupt");

        // Clearing a corrupt file replaces it with an empty record.
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.load(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_no_temp_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::new(&path);
        storage.store(TOKEN_KEY, "x.y.z").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
