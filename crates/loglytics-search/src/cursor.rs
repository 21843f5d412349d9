//! Opaque pagination cursor for composite aggregations.
//!
//! The cursor is base64(JSON(after-key)) — a black box to callers. Foreign or
//! stale cursors fail decoding with [`SearchError::InvalidCursor`]; a stale
//! but well-formed cursor is fed to the engine verbatim and simply yields
//! whatever page the engine resolves it to.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use crate::error::SearchError;

pub fn encode_after_key(key: &Value) -> Result<String, SearchError> {
    let json = serde_json::to_vec(key).map_err(|_| SearchError::InvalidCursor)?;
    Ok(STANDARD.encode(json))
}

pub fn decode_after_key(cursor: &str) -> Result<Value, SearchError> {
    let decoded = STANDARD
        .decode(cursor)
        .map_err(|_| SearchError::InvalidCursor)?;
    serde_json::from_slice(&decoded).map_err(|_| SearchError::InvalidCursor)
}
