//! Error types for QR rendering.

use qrcode::EcLevel;
use thiserror::Error;

/// Errors raised while turning a chunk payload into a QR symbol.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No QR version 1..=40 holds the payload at this error-correction level.
    #[error("payload of {length} characters exceeds QR capacity at error correction {ec_level:?}")]
    Capacity { length: usize, ec_level: EcLevel },

    #[error("invalid QR payload: {0}")]
    InvalidPayload(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
