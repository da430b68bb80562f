//! High-level API for the prompt optimizer.
//!
//! [`Optimizer`] wires a key-value store, the history and template
//! stores, and a completion client together. It is the entry point for the
//! CLI and the HTTP server.

pub mod config;
pub mod error;
pub mod optimizer;

pub use config::{Config, ServerSettings, DEFAULT_API_KEY_ENV};
pub use error::{SdkError, SdkResult};
pub use optimizer::{ExportDocument, OptimizeRequest, Optimizer};

// Re-export key types
pub use popt_complete::{ChatConfig, Completer, CompletionError, ScriptedCompleter};
pub use popt_diff::{Segment, VersionComparison, WordDiff};
pub use popt_history::{snapshots, ImportReport, Snapshot, TransferError};
pub use popt_store::{FileKvStore, InMemoryKvStore, KvStore};
pub use popt_types::{
    short_id, Entry, OptimizationResult, Score, ScoreBand, Template, Timestamp, Version,
};
