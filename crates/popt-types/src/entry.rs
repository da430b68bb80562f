//! History entries and their version snapshots.
//!
//! Field names follow the persisted document layout (`templatesUsed`,
//! `createdAt`, `updatedAt`). Only `id`, `original`, `optimized` and
//! `createdAt` are required; every other field tolerates being absent or
//! `null` so documents written by older front ends still load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;
use crate::id::new_id;
use crate::result::OptimizationResult;
use crate::score::Score;
use crate::temporal::Timestamp;

/// Fields an entry record must carry (as non-empty strings) to be accepted.
pub const REQUIRED_ENTRY_FIELDS: [&str; 4] = ["id", "original", "optimized", "createdAt"];

/// One tracked prompt and its latest optimization result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque unique id, stable for the life of the entry.
    pub id: String,
    /// Source prompt text for the current round.
    pub original: String,
    /// Latest rewritten prompt.
    pub optimized: String,
    /// Latest score; `None` means unscored.
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Superseded results, oldest first. Append-only.
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<Version>,
    /// Advisory template references; dangling ids are tolerated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub templates_used: Vec<String>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Entry {
    /// Create a fresh entry from the first successful optimization of a
    /// prompt. The version chain starts empty.
    pub fn new(
        original: impl Into<String>,
        result: OptimizationResult,
        tags: Vec<String>,
        templates_used: Vec<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: new_id(),
            original: original.into(),
            optimized: result.optimized,
            score: result.score,
            explanation: result.explanation,
            related: result.related,
            tags,
            versions: Vec::new(),
            templates_used,
            created_at: now.clone(),
            updated_at: Some(now),
        }
    }

    /// Validate a raw JSON record and decode it.
    ///
    /// Only the required fields are checked: `id` must be a non-empty string
    /// or a number (kept in its string form), the other three non-empty
    /// strings. Optional fields are read loosely. A score may be a number or
    /// a numeric string, a bare string stands for a one-item list, and
    /// anything unreadable falls back to its empty value.
    pub fn from_record(value: &Value) -> Result<Self, TypeError> {
        let obj = value.as_object().ok_or(TypeError::NotAnObject)?;
        let id = loose_id(obj.get("id")).ok_or(TypeError::MissingField("id"))?;
        let original = required_text(obj, "original")?;
        let optimized = required_text(obj, "optimized")?;
        let created_at = required_text(obj, "createdAt")?;
        Ok(Self {
            id,
            original,
            optimized,
            score: obj.get("score").and_then(Score::from_json),
            explanation: loose_text(obj.get("explanation")),
            related: loose_list(obj.get("related")),
            tags: loose_list(obj.get("tags")),
            versions: obj
                .get("versions")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Version::from_record).collect())
                .unwrap_or_default(),
            templates_used: loose_list(obj.get("templatesUsed")),
            created_at: Timestamp::from(created_at),
            updated_at: obj
                .get("updatedAt")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(Timestamp::from),
        })
    }

    /// The current top-level result.
    pub fn current_result(&self) -> OptimizationResult {
        OptimizationResult {
            optimized: self.optimized.clone(),
            score: self.score,
            explanation: self.explanation.clone(),
            related: self.related.clone(),
        }
    }

    /// Timestamp of the last modification, falling back to creation time.
    pub fn last_modified(&self) -> &Timestamp {
        self.updated_at.as_ref().unwrap_or(&self.created_at)
    }
}

/// Immutable snapshot of a superseded optimization result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub optimized: String,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Version {
    /// Read a stored version loosely. Non-object items are skipped; a missing
    /// id gets a fresh one.
    pub fn from_record(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            id: loose_id(obj.get("id")).unwrap_or_else(new_id),
            optimized: loose_text(obj.get("optimized")),
            score: obj.get("score").and_then(Score::from_json),
            explanation: loose_text(obj.get("explanation")),
            created_at: Timestamp::from(loose_text(obj.get("createdAt"))),
        })
    }

    /// Snapshot the top-level result of `entry` as it stands now.
    pub fn snapshot_of(entry: &Entry, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            optimized: entry.optimized.clone(),
            score: entry.score,
            explanation: entry.explanation.clone(),
            created_at: now,
        }
    }
}

fn required_text(obj: &Map<String, Value>, field: &'static str) -> Result<String, TypeError> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(TypeError::MissingField(field))
}

fn loose_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn loose_text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn loose_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
