//! Error reporting channel for store operations.
//!
//! The infallible store operations swallow errors at the store boundary.
//! Before they do, the error is handed to a [`StoreObserver`] so the hosting
//! application decides how failures surface.

use tracing::warn;

use crate::error::StoreError;

/// Receives failures that the store converts into `false` or empty results.
pub trait StoreObserver: Send + Sync {
    /// An operation on `key` failed.
    fn on_error(&self, key: &str, error: &StoreError);

    /// Invalid records were filtered out while reading `key`.
    fn on_records_dropped(&self, key: &str, dropped: usize) {
        warn!(key, dropped, "dropped invalid records");
    }
}

/// Default observer: logs through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_error(&self, key: &str, error: &StoreError) {
        if error.is_corrupt() {
            warn!(key, %error, "persisted document is corrupt; treating as empty");
        } else {
            warn!(key, %error, "store operation failed");
        }
    }
}
