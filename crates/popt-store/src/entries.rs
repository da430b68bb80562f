//! The history entry store.

use std::sync::{Arc, Mutex, MutexGuard};

use popt_types::Entry;
use tracing::debug;

use crate::document::{decode_list, encode_list};
use crate::error::{StoreError, StoreResult};
use crate::observer::{StoreObserver, TracingObserver};
use crate::traits::KvStore;

/// Key of the history document.
pub const HISTORY_KEY: &str = "history";

/// Maximum number of entries retained by default.
pub const DEFAULT_HISTORY_CAP: usize = 1000;

/// What an upsert did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new id was inserted at the front; `evicted` entries fell off the back.
    Inserted { evicted: usize },
    /// An existing entry was replaced in place.
    Replaced,
}

/// CRUD over history entries with id-based upsert and a retention cap.
///
/// Entries are kept most-recent-first. Inserting a new id places it at the
/// front; once the document holds more than `cap` entries the oldest ones
/// (at the back) are evicted.
pub struct EntryStore {
    kv: Arc<dyn KvStore>,
    observer: Arc<dyn StoreObserver>,
    cap: usize,
    write_lock: Mutex<()>,
}

impl EntryStore {
    /// Create a store over `kv` with the default cap and a tracing observer.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            observer: Arc::new(TracingObserver),
            cap: DEFAULT_HISTORY_CAP,
            write_lock: Mutex::new(()),
        }
    }

    /// Override the retention cap (minimum 1).
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    /// Route swallowed errors to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The retention cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    // -----------------------------------------------------------------------
    // Fail-open API
    // -----------------------------------------------------------------------

    /// All entries, most recent first.
    ///
    /// A corrupt or unreadable document yields an empty list; the error goes
    /// to the observer.
    pub fn get_all(&self) -> Vec<Entry> {
        self.try_get_all().unwrap_or_else(|e| {
            self.observer.on_error(HISTORY_KEY, &e);
            Vec::new()
        })
    }

    /// Look up one entry by id.
    pub fn get(&self, id: &str) -> Option<Entry> {
        self.get_all().into_iter().find(|e| e.id == id)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.get_all().len()
    }

    /// Returns `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace `entry`. Returns `false` if the document could not
    /// be written.
    pub fn upsert(&self, entry: &Entry) -> bool {
        self.report(self.try_upsert(entry)).is_some()
    }

    /// Remove the entry with `id`. Removing a missing id succeeds.
    pub fn delete(&self, id: &str) -> bool {
        self.report(self.try_delete(id)).is_some()
    }

    // -----------------------------------------------------------------------
    // Fallible API
    // -----------------------------------------------------------------------

    /// All entries, or the error that prevented reading them.
    pub fn try_get_all(&self) -> StoreResult<Vec<Entry>> {
        let Some(bytes) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        let decoded = decode_list(HISTORY_KEY, &bytes, Entry::from_record)?;
        if decoded.dropped > 0 {
            self.observer.on_records_dropped(HISTORY_KEY, decoded.dropped);
        }
        Ok(decoded.items)
    }

    /// Insert or replace `entry`.
    pub fn try_upsert(&self, entry: &Entry) -> StoreResult<UpsertOutcome> {
        let cap = self.cap;
        let outcome = self.try_modify(|entries| {
            match entries.iter().position(|e| e.id == entry.id) {
                Some(idx) => {
                    entries[idx] = entry.clone();
                    UpsertOutcome::Replaced
                }
                None => {
                    entries.insert(0, entry.clone());
                    UpsertOutcome::Inserted {
                        evicted: entries.len().saturating_sub(cap),
                    }
                }
            }
        })?;
        debug!(id = %entry.id, ?outcome, "upserted entry");
        Ok(outcome)
    }

    /// Remove the entry with `id`. Returns whether an entry was removed. The
    /// document is not rewritten when nothing matched.
    pub fn try_delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock()?;
        let mut entries = self.load_for_write()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        debug!(id, "deleted entry");
        Ok(true)
    }

    /// Run a read-modify-write over the whole entry list.
    ///
    /// `f` sees the current entries (most recent first) and may reorder,
    /// insert or remove freely. The result is truncated to the cap before it
    /// is written.
    pub fn try_modify<R>(&self, f: impl FnOnce(&mut Vec<Entry>) -> R) -> StoreResult<R> {
        let _guard = self.lock()?;
        let mut entries = self.load_for_write()?;
        let result = f(&mut entries);
        if entries.len() > self.cap {
            debug!(
                evicted = entries.len() - self.cap,
                cap = self.cap,
                "evicting oldest entries"
            );
            entries.truncate(self.cap);
        }
        self.save(&entries)?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    /// Load for a write. A corrupt document is reported and replaced by the
    /// write, matching the fail-open read.
    fn load_for_write(&self) -> StoreResult<Vec<Entry>> {
        match self.try_get_all() {
            Err(e) if e.is_corrupt() => {
                self.observer.on_error(HISTORY_KEY, &e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &[Entry]) -> StoreResult<()> {
        let bytes = encode_list(entries)?;
        self.kv.set(HISTORY_KEY, &bytes)
    }

    fn report<T>(&self, result: StoreResult<T>) -> Option<T> {
        result
            .map_err(|e| self.observer.on_error(HISTORY_KEY, &e))
            .ok()
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore").field("cap", &self.cap).finish()
    }
}
