//! Persistence seam for world records.
//!
//! The core never touches files or databases. A [`RecordStore`] is whatever
//! can "store a mapping" and "load a mapping" under a key; callers plug in
//! their own medium. [`MemoryStore`] is the in-process implementation used
//! by tests and demos.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use worldbench_graph::WorldGraph;

use crate::convert::{from_value, to_value};
use crate::error::RecordError;

/// A keyed store of untyped records.
pub trait RecordStore: Send + Sync {
    /// Stores a record, replacing any record under the same key.
    ///
    /// # Errors
    ///
    /// Implementations report medium-specific failures.
    fn store(&self, key: &str, record: Value) -> Result<(), RecordError>;

    /// Loads the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if nothing is stored under the key.
    fn load(&self, key: &str) -> Result<Value, RecordError>;

    /// Returns every stored key.
    fn keys(&self) -> Vec<String>;
}

/// Records held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<IndexMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn store(&self, key: &str, record: Value) -> Result<(), RecordError> {
        self.records.write().insert(key.to_owned(), record);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Value, RecordError> {
        self.records
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(key.to_owned()))
    }

    fn keys(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }
}

/// Stores a world under `key`.
///
/// # Errors
///
/// Returns [`RecordError::Serialization`] if the world cannot be encoded, or
/// any error of the store.
pub fn save_world<S>(store: &S, key: &str, world: &WorldGraph) -> Result<(), RecordError>
where
    S: RecordStore + ?Sized,
{
    store.store(key, to_value(world)?)?;
    tracing::debug!(key, world = %world.name(), "saved world record");
    Ok(())
}

/// Loads the world stored under `key`.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] if nothing is stored under the key, or
/// any error of [`from_value`](crate::convert::from_value).
pub fn load_world<S>(store: &S, key: &str) -> Result<WorldGraph, RecordError>
where
    S: RecordStore + ?Sized,
{
    from_value(store.load(key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn store_replaces_existing_key() {
        let store = MemoryStore::new();
        store.store("w", json!({ "v": 1 })).unwrap();
        store.store("w", json!({ "v": 2 })).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("w").unwrap()["v"], 2);
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.load("absent").unwrap_err();
        assert!(matches!(err, RecordError::NotFound(ref key) if key == "absent"));
        assert_eq!(err.to_string(), "no record stored under key 'absent'");
    }

    #[test]
    fn keys_keep_insertion_order() {
        let store = MemoryStore::new();
        for key in ["b", "a", "c"] {
            store.store(key, Value::Null).unwrap();
        }
        assert_eq!(store.keys(), ["b", "a", "c"]);
    }

    #[test]
    fn works_behind_trait_object() {
        let store: Box<dyn RecordStore> = Box::new(MemoryStore::new());
        let err = load_world(store.as_ref(), "nothing").unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }
}
