//! Export to and merge-on-import from portable JSON documents.
//!
//! An export document is the full entry list, most recent first, as a
//! pretty-printed JSON array. Importing validates the document, keeps the
//! items that carry every required field, and prepends them to the current
//! history. Ids are not reconciled: an imported entry whose id already exists
//! is kept alongside the existing one, ahead of it.

use chrono::NaiveDate;
use popt_store::EntryStore;
use popt_types::Entry;
use serde_json::Value;
use tracing::info;

use crate::error::{TransferError, TransferResult};

/// Encode `entries` as a pretty-printed JSON array.
pub fn export(entries: &[Entry]) -> TransferResult<String> {
    serde_json::to_string_pretty(entries).map_err(|e| TransferError::Serialization(e.to_string()))
}

/// Export everything in `store`.
pub fn export_store(store: &EntryStore) -> TransferResult<String> {
    export(&store.try_get_all()?)
}

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("prompt-optimizer-history-{}.json", date.format("%Y-%m-%d"))
}

/// Parse document text. Invalid JSON is a [`TransferError::Format`] error.
pub fn parse_document(text: &str) -> TransferResult<Value> {
    serde_json::from_str(text).map_err(|e| TransferError::Format(e.to_string()))
}

/// The valid items of an import document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportBatch {
    pub entries: Vec<Entry>,
    /// Items dropped for missing or malformed fields.
    pub dropped: usize,
}

impl ImportBatch {
    /// Validate `document`: the root must be an array with at least one item
    /// carrying the required entry fields.
    pub fn from_document(document: &Value) -> TransferResult<Self> {
        let items = document
            .as_array()
            .ok_or_else(|| TransferError::Format(format!("found {}", json_kind(document))))?;
        let entries: Vec<Entry> = items
            .iter()
            .filter_map(|item| Entry::from_record(item).ok())
            .collect();
        if entries.is_empty() {
            return Err(TransferError::EmptyImport);
        }
        Ok(Self {
            dropped: items.len() - entries.len(),
            entries,
        })
    }
}

/// Outcome of an import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportReport {
    /// Valid items taken from the document.
    pub imported: usize,
    /// Items dropped for missing or malformed fields.
    pub dropped: usize,
    /// Entries in the history after the merge.
    pub total: usize,
}

/// Prepend `imported` to `current` and keep the first `cap` entries.
pub fn merge(imported: Vec<Entry>, current: Vec<Entry>, cap: usize) -> Vec<Entry> {
    let mut merged = imported;
    merged.extend(current);
    merged.truncate(cap);
    merged
}

/// Merge `document` into `current` without touching any store.
pub fn import(
    document: &Value,
    current: Vec<Entry>,
    cap: usize,
) -> TransferResult<(Vec<Entry>, ImportReport)> {
    let batch = ImportBatch::from_document(document)?;
    let imported = batch.entries.len();
    let merged = merge(batch.entries, current, cap);
    let report = ImportReport {
        imported,
        dropped: batch.dropped,
        total: merged.len(),
    };
    Ok((merged, report))
}

/// Validate `document` and merge it into `store`.
///
/// Validation happens before the store is touched, so a rejected document
/// leaves the history unchanged.
pub fn import_into(store: &EntryStore, document: &Value) -> TransferResult<ImportReport> {
    let batch = ImportBatch::from_document(document)?;
    let imported = batch.entries.len();
    let dropped = batch.dropped;
    let cap = store.cap();
    let total = store.try_modify(move |entries| {
        let current = std::mem::take(entries);
        *entries = merge(batch.entries, current, cap);
        entries.len()
    })?;
    info!(imported, dropped, total, "imported history");
    Ok(ImportReport {
        imported,
        dropped,
        total,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
