//! Thread-safe key-value store for consumer counters.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors from typed access to the store.
#[derive(Debug, Error)]
pub enum StateError {
    /// The stored value does not have the requested shape.
    #[error("state entry {key:?} has an unexpected type: {source}")]
    Type {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// `increment` was called on a value that is not an integer.
    #[error("state entry {0:?} is not an integer counter")]
    NotACounter(String),
}

/// Key-value scratch space shared between consumers.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<DashMap<String, Value>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Current value of `key`, or `None` if it was never set.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    /// Typed read of `key`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateError> {
        match self.get(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StateError::Type {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Add `delta` to the integer at `key`, treating a missing entry as 0.
    ///
    /// The read and the write happen under the same shard lock.
    pub fn increment(&self, key: &str, delta: i64) -> Result<i64, StateError> {
        match self.inner.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let current = entry
                    .get()
                    .as_i64()
                    .ok_or_else(|| StateError::NotACounter(key.to_string()))?;
                let next = current.saturating_add(delta);
                entry.insert(Value::from(next));
                Ok(next)
            }
            Entry::Vacant(entry) => {
                entry.insert(Value::from(delta));
                Ok(delta)
            }
        }
    }

    /// Remove `key`, returning its last value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.remove(key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_keys_are_isolated() {
        let store = StateStore::new();
        store.set("a", 1);
        store.set("b", 2);

        assert_eq!(store.get("a"), Some(json!(1)));
        assert_eq!(store.get("b"), Some(json!(2)));
        assert_eq!(store.get("c"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_overwrites() {
        let store = StateStore::new();
        store.set("car_count", 10);
        store.set("car_count", json!({"cars": 11}));
        assert_eq!(store.get("car_count"), Some(json!({"cars": 11})));
    }

    #[test]
    fn test_typed_reads() {
        let store = StateStore::new();
        store.set("car_count", 42u64);
        store.set("flag", true);

        assert_eq!(store.get_as::<u64>("car_count").unwrap(), Some(42));
        assert_eq!(store.get_as::<bool>("flag").unwrap(), Some(true));
        assert_eq!(store.get_as::<u64>("missing").unwrap(), None);
        assert!(matches!(
            store.get_as::<u64>("flag"),
            Err(StateError::Type { .. })
        ));
    }

    #[test]
    fn test_increment() {
        let store = StateStore::new();
        assert_eq!(store.increment("hits", 1).unwrap(), 1);
        assert_eq!(store.increment("hits", 4).unwrap(), 5);

        store.set("name", "car");
        assert!(matches!(
            store.increment("name", 1),
            Err(StateError::NotACounter(_))
        ));
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = StateStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        store.increment("hits", 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get_as::<i64>("hits").unwrap(), Some(8000));
    }

    #[test]
    fn test_remove() {
        let store = StateStore::new();
        store.set("a", 1);
        assert_eq!(store.remove("a"), Some(json!(1)));
        assert!(store.is_empty());
        assert_eq!(store.remove("a"), None);
    }
}
