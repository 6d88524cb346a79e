//! Argument payload codec.
//!
//! Arguments travel as a JSON array. The relay never interprets them beyond
//! counting, so they stay as [`serde_json::Value`]s end to end.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding an argument payload
#[derive(Debug, Error)]
pub enum ArgsError {
    /// The payload is not a serialized JSON list
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Decode a serialized argument list.
///
/// An empty payload is the empty list.
///
/// # Errors
///
/// Returns [`ArgsError::MalformedPayload`] if the payload is not a JSON array.
pub fn decode_args(payload: &str) -> Result<Vec<Value>, ArgsError> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(payload)?)
}

/// Serialize an ordered argument list.
pub fn encode_args(args: &[Value]) -> String {
    // `Value` maps always have string keys, so serialization cannot fail.
    serde_json::to_string(args).unwrap_or_else(|_| String::from("[]"))
}
