use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. An optional byte quota mimics the
/// storage limits of browser-style key-value media: a `set` that would push
/// the total size of all values over the quota fails with
/// [`StoreError::QuotaExceeded`] and leaves the previous value in place.
pub struct InMemoryKvStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
}

impl InMemoryKvStore {
    /// Create a new empty store without a quota.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create a new empty store that holds at most `quota` bytes in total.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> usize {
        self.values
            .read()
            .map(|m| m.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {e}"))
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.values.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.values.write().map_err(poisoned)?;
        if let Some(limit) = self.quota {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.values.write().map_err(poisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        let map = self.values.read().map_err(poisoned)?;
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("quota", &self.quota)
            .finish()
    }
}
