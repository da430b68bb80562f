//! Encoding of the persisted list documents.
//!
//! Both documents are JSON arrays. Reading is strict about the top-level
//! shape (anything other than an array is [`StoreError::Corrupt`]) and
//! lenient about items: items that fail validation are dropped and counted.

use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Items decoded from a list document plus the number of items dropped.
#[derive(Debug)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub dropped: usize,
}

/// Decode a JSON array, validating each item with `decode`.
pub fn decode_list<T, E>(
    key: &str,
    bytes: &[u8],
    decode: impl Fn(&Value) -> Result<T, E>,
) -> StoreResult<Decoded<T>> {
    let root: Value = serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let Value::Array(raw) = root else {
        return Err(StoreError::Corrupt {
            key: key.to_string(),
            reason: "top-level value is not an array".to_string(),
        });
    };
    let total = raw.len();
    let items: Vec<T> = raw.iter().filter_map(|v| decode(v).ok()).collect();
    Ok(Decoded {
        dropped: total - items.len(),
        items,
    })
}

/// Encode a list as compact JSON.
pub fn encode_list<T: Serialize>(items: &[T]) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(items).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_u64(v: &Value) -> Result<u64, ()> {
        v.as_u64().ok_or(())
    }

    #[test]
    fn decodes_array_and_counts_drops() {
        let d = decode_list("k", br#"[1, "x", 3, null]"#, as_u64).unwrap();
        assert_eq!(d.items, vec![1, 3]);
        assert_eq!(d.dropped, 2);
    }

    #[test]
    fn malformed_json_is_corrupt() {
        let err = decode_list("k", b"{not json", as_u64).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn non_array_root_is_corrupt() {
        let err = decode_list("history", br#"{"a":1}"#, as_u64).unwrap_err();
        match err {
            StoreError::Corrupt { key, .. } => assert_eq!(key, "history"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_is_compact_array() {
        let bytes = encode_list(&[1, 2, 3]).unwrap();
        assert_eq!(bytes, b"[1,2,3]");
    }
}
