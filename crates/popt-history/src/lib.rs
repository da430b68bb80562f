//! History operations for the prompt optimizer.
//!
//! Everything here works on plain entry lists; persistence is delegated to
//! [`popt_store::EntryStore`].
//!
//! # Modules
//!
//! - [`chain`] -- appending superseded results to an entry's version chain
//! - [`search`] -- case-insensitive substring filtering
//! - [`transfer`] -- export to a JSON document and merge-on-import
//! - [`error`] -- import/export errors

pub mod chain;
pub mod error;
pub mod search;
pub mod transfer;

pub use chain::{append_version, snapshots, Snapshot};
pub use error::{TransferError, TransferResult};
pub use search::{search, SearchQuery};
pub use transfer::{
    export, export_file_name, export_store, import, import_into, merge, parse_document,
    ImportBatch, ImportReport,
};
