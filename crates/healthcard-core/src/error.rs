//! Error types for the health card core pipeline.

use thiserror::Error;

/// Errors raised while building, signing, or encoding a health card.
///
/// Every variant is terminal for the issuance that produced it.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization failed at {stage}: {source}")]
    Serialization {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error(
        "character {character:?} (code point {code_point}) at position {position} \
         is outside the numeric window during {stage}"
    )]
    EncodingRange {
        stage: &'static str,
        character: char,
        code_point: u32,
        position: usize,
    },

    #[error("chunk plan invariant violated: {0}")]
    ChunkPlan(String),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

impl CoreError {
    pub(crate) fn serialization(stage: &'static str, source: serde_json::Error) -> Self {
        CoreError::Serialization { stage, source }
    }
}

/// Errors raised while checking a compact token against a public key.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("unsupported header: {0}")]
    UnsupportedHeader(String),

    #[error("signature verification failed")]
    SignatureMismatch,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("payload decompression failed: {0}")]
    Decompression(std::io::Error),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type for core pipeline operations.
pub type Result<T> = std::result::Result<T, CoreError>;
