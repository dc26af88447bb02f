//! JSON encoding of essences for annotation storage.
//!
//! Encoding is compact and deterministic (mapping keys are sorted), and
//! decoding is exact: `decode(encode(e)) == e` for every essence, including
//! the integer/float distinction of numbers.

use lastseen_types::{Essence, Value};

use crate::error::{StoreError, StoreResult};

/// Serialize an essence to its annotation text.
pub fn encode_essence(essence: &Essence) -> StoreResult<String> {
    serde_json::to_string(essence).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Parse annotation text stored under `key` back into an essence.
pub fn decode_essence(key: &str, text: &str) -> StoreResult<Essence> {
    let value: Value = serde_json::from_str(text).map_err(|e| StoreError::Parse {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    match value {
        Value::Mapping(mapping) => Ok(Essence::new(mapping)),
        _ => Err(StoreError::NotAMapping {
            key: key.to_string(),
        }),
    }
}
