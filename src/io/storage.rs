use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Key of the global task collection
pub const GLOBAL_TASKS_KEY: &str = "app-global-todos";
/// Key of the tag collection
pub const TAGS_KEY: &str = "app-tags";
const DATE_KEY_PREFIX: &str = "app-todos-";

/// Storage key of the task collection for one day, e.g. `app-todos-16.10.2026`
pub fn date_key(date: NaiveDate) -> String {
    format!("{}{}", DATE_KEY_PREFIX, date.format("%d.%m.%Y"))
}

/// Inverse of [`date_key`]
pub fn date_from_key(key: &str) -> Option<NaiveDate> {
    let rest = key.strip_prefix(DATE_KEY_PREFIX)?;
    NaiveDate::parse_from_str(rest, "%d.%m.%Y").ok()
}

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key \"{0}\"")]
    InvalidKey(String),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    /// The file exists but is not UTF-8; `content` is a lossy decode for the recovery log
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf, content: String },
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// A string key-value store holding JSON documents.
///
/// Stores hold a `&mut` to one of these and write whole documents back after
/// every mutation; there is one writer at a time and the last write wins.
pub trait Storage {
    /// The raw document under `key`, or `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the document under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Delete `key`; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Keep a record of data that was dropped or could not be written
    fn record(&mut self, entry: RecoveryEntry);
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn record(&mut self, entry: RecoveryEntry) {
        (**self).record(entry)
    }
}

// ---------------------------------------------------------------------------
// File-backed storage
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key in a data directory; the recovery log lives
/// alongside as `.recovery.log`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a data directory
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStorage {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Dates that have a stored task collection, oldest first
    pub fn stored_dates(&self) -> Result<Vec<NaiveDate>, StorageError> {
        let mut dates = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| StorageError::ReadError {
            path: self.dir.clone(),
            source: e,
        })?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(date) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(date_from_key)
            {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }
}

/// Keys become file names, so keep them to a safe alphabet
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::ReadError { path, source: e }),
        };
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(e) => Err(StorageError::NotUtf8 {
                content: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                path,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Err(e) = recovery::atomic_write(&path, value.as_bytes()) {
            self.record(
                RecoveryEntry::for_key(RecoveryCategory::Write, key, "write failed", value)
                    .with_field("Error", e.to_string()),
            );
            return Err(StorageError::WriteError { path, source: e });
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteError { path, source: e }),
        }
    }

    fn record(&mut self, entry: RecoveryEntry) {
        recovery::log_recovery(&self.dir, entry);
    }
}

// ---------------------------------------------------------------------------
// In-memory storage
// ---------------------------------------------------------------------------

/// A `HashMap` store; recovery entries are kept in memory for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    pub recovered: Vec<RecoveryEntry>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for seeding test data
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn record(&mut self, entry: RecoveryEntry) {
        self.recovered.push(entry);
    }
}
