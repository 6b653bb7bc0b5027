//! Canonical JSON encoding of credentials for signing.
//!
//! The signed payload is compact JSON:
//! - Top-level keys in fixed order: `iss`, `nbf`, `vc`
//! - No whitespace between tokens
//! - `nbf` as an integer, never a formatted date
//! - Nested object keys sorted (serde_json's default map is ordered)
//!
//! Any stray whitespace inflates the compressed payload and can push a card
//! over the single-symbol threshold, so this encoding must stay compact.

use crate::credential::Credential;
use crate::error::{CoreError, Result};

/// Encode a credential to canonical bytes.
pub fn canonical_bytes(credential: &Credential) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec(credential)
        .map_err(|e| CoreError::serialization("canonicalize", e))?;

    tracing::debug!(canonical_len = bytes.len(), "canonicalized credential");
    Ok(bytes)
}

/// Decode a credential from canonical bytes.
pub fn decode_credential(bytes: &[u8]) -> Result<Credential> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::serialization("decode", e))
}
