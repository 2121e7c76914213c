//! Reading and writing JSON collections under a storage key.
//!
//! Loading never fails on bad data: a document that is not a JSON array is
//! logged and deleted (so is one that is not UTF-8), entries that do not have the expected shape are logged
//! and skipped. Only storage I/O errors are returned.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry};
use crate::io::storage::{Storage, StorageError};

/// Load the array under `key`, keeping the entries `accept` returns `Some` for
pub fn load_entries<S, T, F>(storage: &mut S, key: &str, accept: F) -> Result<Vec<T>, StorageError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
    F: Fn(T) -> Option<T>,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(Vec::new()),
        Err(StorageError::NotUtf8 { content, .. }) => {
            discard(storage, key, "document is not valid UTF-8", content)?;
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let items = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            discard(storage, key, "document is not a list", raw)?;
            return Ok(Vec::new());
        }
        Err(e) => {
            discard(storage, key, &format!("unparsable document ({})", e), raw)?;
            return Ok(Vec::new());
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let body = item.to_string();
        match serde_json::from_value::<T>(item).ok().and_then(&accept) {
            Some(entry) => entries.push(entry),
            None => storage.record(
                RecoveryEntry::for_key(RecoveryCategory::Parser, key, "dropped invalid entry", body)
                    .with_field("Index", idx.to_string()),
            ),
        }
    }
    Ok(entries)
}

/// Serialize the full collection and write it under `key`
pub fn save_entries<S, T>(storage: &mut S, key: &str, entries: &[T]) -> Result<(), SaveError>
where
    S: Storage + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(entries)?;
    storage.set(key, &json)?;
    Ok(())
}

/// Failure while persisting a collection
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn discard<S: Storage + ?Sized>(
    storage: &mut S,
    key: &str,
    reason: &str,
    raw: String,
) -> Result<(), StorageError> {
    storage.record(RecoveryEntry::for_key(RecoveryCategory::Parser, key, reason, raw));
    storage.remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::task::Task;

    fn keep(task: Task) -> Option<Task> {
        Some(task)
    }

    #[test]
    fn missing_key_is_empty() {
        let mut storage = MemoryStorage::new();
        let tasks: Vec<Task> = load_entries(&mut storage, "k", keep).unwrap();
        assert!(tasks.is_empty());
        assert!(storage.recovered.is_empty());
    }

    #[test]
    fn invalid_json_is_discarded_and_logged() {
        let mut storage = MemoryStorage::new().with_entry("k", "{not json");
        let tasks: Vec<Task> = load_entries(&mut storage, "k", keep).unwrap();
        assert!(tasks.is_empty());
        assert!(!storage.contains_key("k"));
        assert_eq!(storage.recovered.len(), 1);
        assert_eq!(storage.recovered[0].body, "{not json");
        assert!(storage.recovered[0].description.starts_with("unparsable document"));
    }

    #[test]
    fn non_array_is_discarded() {
        let mut storage = MemoryStorage::new().with_entry("k", r#"{"id":"a"}"#);
        let tasks: Vec<Task> = load_entries(&mut storage, "k", keep).unwrap();
        assert!(tasks.is_empty());
        assert!(!storage.contains_key("k"));
        assert_eq!(storage.recovered[0].description, "document is not a list");
    }

    #[test]
    fn bad_entries_are_skipped_individually() {
        let mut storage = MemoryStorage::new().with_entry(
            "k",
            r#"[{"id":"a","title":"ok","isCompleted":false},42,{"title":"no id","isCompleted":true}]"#,
        );
        let tasks: Vec<Task> = load_entries(&mut storage, "k", keep).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "a");
        // Key is kept; only the document as a whole gets discarded
        assert!(storage.contains_key("k"));
        assert_eq!(storage.recovered.len(), 2);
        assert_eq!(storage.recovered[0].fields[1], ("Index".to_string(), "1".to_string()));
    }

    #[test]
    fn accept_can_reject_entries() {
        let mut storage = MemoryStorage::new().with_entry(
            "k",
            r#"[{"id":"a","title":"x","isCompleted":false},{"id":"b","title":"y","isCompleted":true}]"#,
        );
        let tasks: Vec<Task> =
            load_entries(&mut storage, "k", |t: Task| (!t.is_completed).then_some(t)).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn save_then_load() {
        let mut storage = MemoryStorage::new();
        let task = Task::new(crate::model::task::NewTask::titled("x"));
        save_entries(&mut storage, "k", std::slice::from_ref(&task)).unwrap();
        let tasks: Vec<Task> = load_entries(&mut storage, "k", keep).unwrap();
        assert_eq!(tasks, vec![task]);
    }
}
