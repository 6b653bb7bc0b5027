//! Whole-card operations: credential to signed token and back.

use crate::canonical::{canonical_bytes, decode_credential};
use crate::compress::{deflate, inflate};
use crate::credential::Credential;
use crate::crypto::{PublicKey, SigningIdentity};
use crate::error::{Result, VerificationError};
use crate::jws::{sign_compact, verify_compact, SignedToken};

/// Canonicalize, compress and sign a credential.
pub fn sign_credential(credential: &Credential, identity: &SigningIdentity) -> Result<SignedToken> {
    let canonical = canonical_bytes(credential)?;
    let compressed = deflate(&canonical)?;
    sign_compact(&compressed, identity)
}

/// Verify a token's signature, then inflate and parse its credential.
pub fn verify_card(
    token: &str,
    key: &PublicKey,
) -> std::result::Result<Credential, VerificationError> {
    let verified = verify_compact(token, key)?;
    let canonical = inflate(&verified.payload)?;
    decode_credential(&canonical).map_err(|e| VerificationError::InvalidPayload(e.to_string()))
}
