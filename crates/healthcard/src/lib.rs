//! # Health Card
//!
//! The unified API for issuing SMART Health Cards: a signed, compressed
//! credential rendered as one or more scannable QR symbols.
//!
//! ## Overview
//!
//! - **Issue**: build `{iss, nbf, vc}`, canonicalize, raw-DEFLATE, sign ES256
//! - **Render**: split the compact token, numeric-encode each slice, draw QR
//! - **Verify**: check a token against the issuer's public key and read it back
//!
//! Issuance is synchronous and holds no shared mutable state, so an
//! [`Issuer`] can be used from many threads at once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use healthcard::{Issuer, IssuerConfig, SigningIdentity};
//! use serde_json::json;
//!
//! fn example() -> healthcard::Result<()> {
//!     let identity = SigningIdentity::generate("k1");
//!     let issuer = Issuer::new(identity, "https://example.org/issuer", IssuerConfig::default());
//!
//!     let (token, symbols) = issuer.issue_qr(&json!({"type": "test"}))?;
//!     for symbol in &symbols {
//!         let _png = symbol.to_png()?;
//!     }
//!     println!("{} chars in {} symbol(s)", token.len(), symbols.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `healthcard::core` - Pipeline stages (canonical, compress, jws, numeric, chunk)
//! - `healthcard::qr` - QR rendering

pub mod error;
pub mod issuer;

// Re-export component crates
pub use healthcard_core as core;
pub use healthcard_qr as qr;

// Re-export main types for convenience
pub use error::{IssueError, Result};
pub use issuer::{decode_qr, generate_qr, issue_card, IssueCardInput, Issuer, IssuerConfig};

// Re-export commonly used core types
pub use healthcard_core::{
    verify_card, ChunkThresholds, Credential, KeySet, PrivateJwk, PublicJwk, PublicKey,
    SignedToken, SigningIdentity,
};
pub use healthcard_qr::{EcLevel, QrSymbol, RenderOptions};
