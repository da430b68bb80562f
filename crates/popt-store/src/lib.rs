//! Key-value persistence for the prompt optimizer.
//!
//! History entries and templates are stored as two independent JSON
//! documents in a byte-oriented key-value store. The store handle is created
//! once per process and injected into [`EntryStore`] and [`TemplateStore`];
//! nothing in this crate holds global state.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and embedding,
//!   with an optional byte quota
//! - [`FileKvStore`] -- one `<key>.json` file per key in a directory
//!
//! # Design Rules
//!
//! 1. Upsert by id is the only write primitive for entries and templates.
//! 2. New entries go to the front; iteration order is most-recent-first.
//! 3. The entry document never exceeds the retention cap (1000 by default).
//! 4. Records are validated on read; invalid records are dropped.
//! 5. Storage failures never cross the store boundary as raw errors: the
//!    infallible operations return `bool` or an empty list and hand the
//!    error to a [`StoreObserver`]. The `try_*` forms return [`StoreError`].
//! 6. Each read-modify-write sequence runs under a mutex.

pub mod document;
pub mod entries;
pub mod error;
pub mod file;
pub mod memory;
pub mod observer;
pub mod templates;
pub mod traits;

pub use entries::{EntryStore, UpsertOutcome, DEFAULT_HISTORY_CAP, HISTORY_KEY};
pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use observer::{StoreObserver, TracingObserver};
pub use templates::{TemplateStore, TEMPLATES_KEY};
pub use traits::KvStore;
