//! Durable key-value slots.
//!
//! The persistence bridge only needs "read the value under a key" and
//! "replace the value under a key". `FileStorage` keeps one JSON file per key
//! in the data directory; `MemoryStorage` keeps everything in a map.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Minimal load/save contract for a named slot.
pub trait Storage {
    /// Raw value under `key`, or `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory, creating it if needed.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| Error::DataDir {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        // Temp file + rename so a crash never leaves a half-written slot.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// Map-backed slots for tests and `--ephemeral` sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a slot, e.g. with a corrupt value.
    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Either backend, picked at startup from the configuration.
#[derive(Debug, Clone)]
pub enum AnyStorage {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl Storage for AnyStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match self {
            AnyStorage::File(s) => s.read(key),
            AnyStorage::Memory(s) => s.read(key),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            AnyStorage::File(s) => s.write(key, value),
            AnyStorage::Memory(s) => s.write(key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_key() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.read("tasks").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(&dir.path().join("nested")).unwrap();
        storage.write("darkMode", "true").unwrap();
        storage.write("darkMode", "false").unwrap();
        assert_eq!(storage.read("darkMode").unwrap().as_deref(), Some("false"));
        assert!(storage.path_for("darkMode").exists());
        assert!(!storage.path_for("darkMode").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_open_under_regular_file() {
        use std::error::Error as _;

        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = FileStorage::open(&blocker.join("data")).unwrap_err();
        match &err {
            Error::DataDir { path, source } => {
                assert_eq!(path, &blocker.join("data"));
                assert_ne!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.source().is_some());
        assert!(err.to_string().contains("not-a-dir"));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new().with_slot("a", "1");
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        storage.write("a", "2").unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("2"));
        assert!(storage.read("b").unwrap().is_none());
    }
}
