//! File-backed store: one JSON object per file.
//!
//! The whole map is rewritten on every mutation. Writes go to a sibling
//! temp file first and are moved into place with `rename`, so a crash
//! mid-write leaves either the old file or the new one, never half of each.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gabarita_protocol::ProtocolError;

use crate::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisted as a JSON object on disk.
///
/// The in-memory map is only updated after the file write succeeds, so
/// memory and disk never disagree after an I/O error.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing file is an empty store; the file is created on the first
    /// write. Parent directories are created as needed.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the file exists but cannot be read.
    /// - [`StoreError::Codec`] if the file is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(ProtocolError::Decode)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "file store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the map, persists it, then swaps it in.
    fn mutate(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        self.write(&next)?;
        *entries = next;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(ProtocolError::Encode)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), keys = entries.len(), "file store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.mutate(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.mutate(|m| {
            m.remove(key);
        })
    }

    fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        self.mutate(|m| {
            for (key, value) in pairs {
                m.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.mutate(|m| {
            for key in keys {
                m.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();

        assert_eq!(store.get("user").unwrap(), None);
        assert!(!store.path().exists(), "nothing written until first set");
    }

    #[test]
    fn test_open_creates_parent_directories_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        let store = FileStore::open(&path).unwrap();

        store.set("authToken", "a1").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = FileStore::open(&path);

        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();

        store.set("k", "v").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
    }
}
