//! Document store
//!
//! Holds every collection in memory as `id -> document`. When opened on a
//! data file, each mutation rewrites the file atomically (temp file, fsync,
//! rename). The file carries a CRC32 checksum of its payload; a mismatch on
//! load is reported as corruption.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use crate::observability::{log_event_with_fields, Event};
use crate::query::DocumentSource;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    /// Last id handed out
    last_id: i64,
    records: BTreeMap<i64, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    collections: BTreeMap<String, Collection>,
}

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct DataFile {
    version: u32,
    checksum: u32,
    payload: String,
}

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// The shared document store
pub struct Store {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
}

impl Store {
    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Open the store backed by `path`, loading it if it exists
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let state = read_data_file(&path)?;
            let records: usize = state.collections.values().map(|c| c.records.len()).sum();
            log_event_with_fields(
                Event::StoreLoaded,
                &[
                    ("path", &path.display().to_string()),
                    ("records", &records.to_string()),
                ],
            );
            state
        } else {
            StoreState::default()
        };

        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// Create an empty data file at `path`
    pub fn init(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io(format!("Failed to create {}", parent.display()), e)
                })?;
            }
        }
        write_data_file(path, &StoreState::default())?;
        log_event_with_fields(
            Event::StoreInitialized,
            &[("path", &path.display().to_string())],
        );
        Self::open(path)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Persist while still holding the write guard, so file order matches
    /// mutation order
    fn flush(&self, state: &StoreState) -> StoreResult<()> {
        let path = match &self.path {
            Some(p) => p,
            None => return Ok(()),
        };
        if let Err(e) = write_data_file(path, state) {
            log_event_with_fields(
                Event::StoreFlushFailed,
                &[("path", &path.display().to_string()), ("error", &e.to_string())],
            );
            return Err(e);
        }
        Ok(())
    }

    /// All documents in `collection`, ordered by id
    pub fn all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let state = self.read()?;
        Ok(state
            .collections
            .get(collection)
            .map(|c| c.records.values().cloned().collect())
            .unwrap_or_default())
    }

    pub fn get(&self, collection: &str, id: i64) -> StoreResult<Option<Value>> {
        let state = self.read()?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|c| c.records.get(&id))
            .cloned())
    }

    pub fn len(&self, collection: &str) -> StoreResult<usize> {
        let state = self.read()?;
        Ok(state.collections.get(collection).map_or(0, |c| c.records.len()))
    }

    pub fn is_empty(&self, collection: &str) -> StoreResult<bool> {
        Ok(self.len(collection)? == 0)
    }

    /// Insert a new document; `build` receives the newly assigned id.
    ///
    /// A failed flush rolls the insert back, including the id sequence.
    pub fn insert_with<F>(&self, collection: &str, build: F) -> StoreResult<Value>
    where
        F: FnOnce(i64) -> Value,
    {
        let mut state = self.write()?;
        let coll = state.collections.entry(collection.to_string()).or_default();
        let prev_last_id = coll.last_id;
        let id = prev_last_id + 1;
        let doc = build(id);
        coll.last_id = id;
        coll.records.insert(id, doc.clone());

        if let Err(e) = self.flush(&state) {
            if let Some(coll) = state.collections.get_mut(collection) {
                coll.records.remove(&id);
                coll.last_id = prev_last_id;
            }
            return Err(e);
        }
        Ok(doc)
    }

    /// Replace an existing document. Returns false if `id` is absent.
    pub fn replace(&self, collection: &str, id: i64, doc: Value) -> StoreResult<bool> {
        let mut state = self.write()?;
        let previous = match state
            .collections
            .get_mut(collection)
            .and_then(|c| c.records.get_mut(&id))
        {
            Some(slot) => std::mem::replace(slot, doc),
            None => return Ok(false),
        };

        if let Err(e) = self.flush(&state) {
            if let Some(slot) = state
                .collections
                .get_mut(collection)
                .and_then(|c| c.records.get_mut(&id))
            {
                *slot = previous;
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Remove a document. Returns false if `id` is absent.
    pub fn remove(&self, collection: &str, id: i64) -> StoreResult<bool> {
        let mut state = self.write()?;
        let removed = match state
            .collections
            .get_mut(collection)
            .and_then(|c| c.records.remove(&id))
        {
            Some(doc) => doc,
            None => return Ok(false),
        };

        if let Err(e) = self.flush(&state) {
            if let Some(coll) = state.collections.get_mut(collection) {
                coll.records.insert(id, removed);
            }
            return Err(e);
        }
        Ok(true)
    }
}

impl DocumentSource for Store {
    type Error = StoreError;

    fn documents(&self, collection: &str) -> StoreResult<Vec<Value>> {
        self.all(collection)
    }
}

fn read_data_file(path: &Path) -> StoreResult<StoreState> {
    let bytes = fs::read(path)
        .map_err(|e| StoreError::io(format!("Failed to read {}", path.display()), e))?;

    let file: DataFile = serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::Corruption(format!("{}: {}", path.display(), e)))?;

    if file.version != FORMAT_VERSION {
        return Err(StoreError::Corruption(format!(
            "{}: unsupported format version {}",
            path.display(),
            file.version
        )));
    }

    if checksum(file.payload.as_bytes()) != file.checksum {
        log_event_with_fields(Event::StoreCorruption, &[("path", &path.display().to_string())]);
        return Err(StoreError::Corruption(format!(
            "{}: checksum mismatch",
            path.display()
        )));
    }

    serde_json::from_str(&file.payload)
        .map_err(|e| StoreError::Corruption(format!("{}: {}", path.display(), e)))
}

fn write_data_file(path: &Path, state: &StoreState) -> StoreResult<()> {
    let payload = serde_json::to_string(state)
        .map_err(|e| StoreError::Corruption(format!("Failed to encode store: {}", e)))?;
    let file = DataFile {
        version: FORMAT_VERSION,
        checksum: checksum(payload.as_bytes()),
        payload,
    };
    let bytes = serde_json::to_vec(&file)
        .map_err(|e| StoreError::Corruption(format!("Failed to encode store: {}", e)))?;

    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp = File::create(&tmp_path)
            .map_err(|e| StoreError::io(format!("Failed to create {}", tmp_path.display()), e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(format!("Failed to write {}", tmp_path.display()), e))?;
        tmp.sync_all()
            .map_err(|e| StoreError::io(format!("Failed to sync {}", tmp_path.display()), e))?;
    }
    fs::rename(&tmp_path, path)
        .map_err(|e| StoreError::io(format!("Failed to replace {}", path.display()), e))?;

    Ok(())
}
