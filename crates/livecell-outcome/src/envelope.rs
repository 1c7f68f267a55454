#![forbid(unsafe_code)]

//! Versioned, transportable encoding for results and states.
//!
//! An envelope is a JSON document:
//!
//! ```json
//! {"format": 1, "payload": {"variant": "Success", "value": 42}}
//! ```
//!
//! The variant tag names the enum case; `value` is the inner payload in its
//! own serde representation (absent for `Idle`/`InProgress`). The base64 form
//! wraps the same bytes for text-only transports.
//!
//! # Failure Modes
//!
//! - **Corrupt bytes or unknown variant**: [`EnvelopeError::Json`].
//! - **Envelope from a newer writer**: [`EnvelopeError::UnsupportedFormat`].
//!   The payload is not inspected.
//! - **Bad base64 text**: [`EnvelopeError::Base64`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, Result};
use crate::result::OperationResult;
use crate::state::OperationState;

/// Format version written into every envelope.
pub const ENVELOPE_FORMAT: u32 = 1;

#[derive(Serialize)]
struct Outgoing<'a, T> {
    format: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Incoming {
    format: u32,
    payload: serde_json::Value,
}

/// Encode `value` into envelope bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&Outgoing {
        format: ENVELOPE_FORMAT,
        payload: value,
    })?)
}

/// Decode envelope bytes produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let incoming: Incoming = serde_json::from_slice(bytes)?;
    if incoming.format != ENVELOPE_FORMAT {
        return Err(EnvelopeError::UnsupportedFormat {
            found: incoming.format,
            expected: ENVELOPE_FORMAT,
        });
    }
    Ok(serde_json::from_value(incoming.payload)?)
}

/// Encode `value` into base64 envelope text.
pub fn encode_base64<T: Serialize>(value: &T) -> Result<String> {
    Ok(STANDARD.encode(encode(value)?))
}

/// Decode base64 envelope text produced by [`encode_base64`].
pub fn decode_base64<T: DeserializeOwned>(text: &str) -> Result<T> {
    let bytes = STANDARD.decode(text.trim())?;
    decode(&bytes)
}

impl<D: Serialize, E: Serialize> OperationResult<D, E> {
    /// Encode into envelope bytes. See [`encode`].
    pub fn to_envelope(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

impl<D: DeserializeOwned, E: DeserializeOwned> OperationResult<D, E> {
    /// Decode from envelope bytes. See [`decode`].
    pub fn from_envelope(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

impl<D: Serialize, E: Serialize> OperationState<D, E> {
    /// Encode into envelope bytes. See [`encode`].
    pub fn to_envelope(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

impl<D: DeserializeOwned, E: DeserializeOwned> OperationState<D, E> {
    /// Decode from envelope bytes. See [`decode`].
    pub fn from_envelope(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}
