use crate::error::StoreResult;

/// Byte-oriented key-value store.
///
/// This is the only seam between the history/template logic and a storage
/// medium. Implementations must satisfy these invariants:
/// - `set` replaces the whole value for a key; a reader never observes a
///   partially written value.
/// - `get` of a key that was never written returns `Ok(None)`.
/// - All I/O errors are returned, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether `key` has a value.
    ///
    /// Default implementation reads the value. Backends may override.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
