//! Key/value record storage backends.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum RecordStoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid record key {0:?} (allowed: ASCII letters, digits, '-', '_')")]
    InvalidKey(String),
}

/// Opaque byte records addressed by key.
pub trait RecordStore {
    /// `Ok(None)` when no record exists under `key`.
    fn get_record(&self, key: &str) -> Result<Option<Vec<u8>>, RecordStoreError>;
    fn put_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), RecordStoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn get_record(&self, key: &str) -> Result<Option<Vec<u8>>, RecordStoreError> {
        (**self).get_record(key)
    }

    fn put_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), RecordStoreError> {
        (**self).put_record(key, bytes)
    }
}

/// Process-local store, mostly for tests and hosts without persistence.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: HashMap<String, Vec<u8>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get_record(&self, key: &str) -> Result<Option<Vec<u8>>, RecordStoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn put_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), RecordStoreError> {
        self.records.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

/// One `<key>.bin` file per record inside `root/<namespace>/`.
#[derive(Clone, Debug)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>, namespace: &str) -> Result<Self, RecordStoreError> {
        validate_key(namespace)?;
        Ok(Self {
            dir: root.into().join(namespace),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, RecordStoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.bin")))
    }
}

impl RecordStore for FileRecordStore {
    fn get_record(&self, key: &str) -> Result<Option<Vec<u8>>, RecordStoreError> {
        let path = self.record_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), RecordStoreError> {
        let path = self.record_path(key)?;
        fs::create_dir_all(&self.dir)?;
        // write-then-rename so a crash never leaves a half-written record
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), RecordStoreError> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(RecordStoreError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_bytes() {
        let mut store = MemoryRecordStore::new();
        assert!(store.get_record("settings").unwrap().is_none());
        store.put_record("settings", &[1, 2, 3]).unwrap();
        assert_eq!(store.get_record("settings").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_store_keeps_records_per_namespace() {
        let root = tempfile::tempdir().unwrap();
        let mut store = FileRecordStore::new(root.path(), "detection").unwrap();
        assert!(store.get_record("settings").unwrap().is_none());

        store.put_record("settings", &[7, 7]).unwrap();
        assert!(root.path().join("detection/settings.bin").is_file());
        assert!(!root.path().join("detection/settings.bin.tmp").exists());

        let reopened = FileRecordStore::new(root.path(), "detection").unwrap();
        assert_eq!(reopened.get_record("settings").unwrap(), Some(vec![7, 7]));
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileRecordStore::new(root.path(), "../up"),
            Err(RecordStoreError::InvalidKey(_))
        ));
        let store = FileRecordStore::new(root.path(), "detection").unwrap();
        assert!(matches!(
            store.get_record("a/b"),
            Err(RecordStoreError::InvalidKey(_))
        ));
    }
}
