//! # Health Card Testkit
//!
//! Testing utilities for health card issuance.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned numeric encodings, chunk boundaries and header bytes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic issuers and key material in PEM and JWK form
//!
//! ## Golden Vectors
//!
//! ```rust
//! use healthcard_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, got) in verify_all_vectors() {
//!     assert!(matches, "{name}: {got}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use healthcard_testkit::generators::{card_from_params, CardParams};
//!
//! proptest! {
//!     #[test]
//!     fn card_verifies(params: CardParams) {
//!         let token = card_from_params(&params);
//!         prop_assert!(healthcard_core::verify_card(token.as_str(), &params.identity.public_key()).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use healthcard_testkit::fixtures::{test_claim, TestIssuer};
//!
//! let issuer = TestIssuer::with_seed([0x42; 32], "k1");
//! let token = issuer.sign(&test_claim());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_issuer_fixtures, TestIssuer};
pub use generators::{card_from_params, CardParams};
pub use vectors::{chunk_vectors, numeric_vectors, verify_all_vectors, ChunkVector, NumericVector};
