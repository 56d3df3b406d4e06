//! Hex and base64 conversions for key material.
//!
//! Keys live on disk as lower-case hex without a prefix. The genesis
//! block carries public keys as standard (padded) base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::keys::KEY_LEN;
use crate::error::{GenesisError, Result};

fn encoding_error(field: &str, reason: impl Into<String>) -> GenesisError {
    GenesisError::Encoding {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Decode hex text into raw bytes. `field` names the value in errors.
pub fn decode_hex(field: &str, text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| encoding_error(field, e.to_string()))
}

/// Decode a 32-byte key from hex text.
pub fn decode_key_hex(field: &str, text: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = decode_hex(field, text)?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        encoding_error(field, format!("expected {KEY_LEN} bytes, got {}", b.len()))
    })
}

/// Re-encode hex text as standard base64 text.
pub fn hex_to_base64(field: &str, text: &str) -> Result<String> {
    let bytes = decode_hex(field, text)?;
    Ok(STANDARD.encode(bytes))
}

/// Decode standard base64 text into raw bytes.
pub fn base64_to_bytes(field: &str, text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| encoding_error(field, e.to_string()))
}
