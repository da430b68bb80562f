//! Identifier generation.
//!
//! Entry, version, and template ids are opaque strings. Imported documents may
//! carry ids in any format, so ids are never parsed; freshly generated ids are
//! UUID v7 for time-ordering.

/// Generate a new time-ordered identifier (UUID v7).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Short display form of an id (first 8 characters).
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
