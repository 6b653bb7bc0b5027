//! # Health Card Core
//!
//! Pure pipeline stages for SMART Health Card issuance: credential building,
//! canonical JSON, raw DEFLATE, ES256 compact JWS, numeric encoding and
//! chunking.
//!
//! This crate contains no I/O beyond in-memory buffers and no global state.
//! Every function is synchronous and re-entrant.
//!
//! ## Key Types
//!
//! - [`Credential`] - The `{iss, nbf, vc}` payload that gets signed
//! - [`SigningIdentity`] - A P-256 private key plus its `kid`
//! - [`SignedToken`] - A compact `header.payload.signature` JWS
//! - [`ChunkPlan`] - How a token is split across QR symbols
//!
//! ## Pipeline
//!
//! ```text
//! Credential -> canonical_bytes -> deflate -> sign_compact
//!            -> plan_chunks -> numeric::encode per chunk
//! ```

pub mod canonical;
pub mod card;
pub mod chunk;
pub mod compress;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod jws;
pub mod numeric;

pub use canonical::{canonical_bytes, decode_credential};
pub use card::{sign_credential, verify_card};
pub use chunk::{
    parse_qr_text, plan_chunks, reassemble, Chunk, ChunkPlan, ChunkThresholds, QrPayload,
    MAX_CHUNK_SIZE, MAX_SINGLE_JWS_SIZE, QR_SCHEME,
};
pub use compress::{deflate, inflate};
pub use credential::{now_secs, Credential, CredentialBuilder};
pub use crypto::{KeySet, PrivateJwk, PublicJwk, PublicKey, SigningIdentity};
pub use error::{CoreError, Result, VerificationError};
pub use jws::{sign_compact, verify_compact, JwsHeader, SignedToken, VerifiedToken};
