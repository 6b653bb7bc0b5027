//! Error types for the issuance facade.

use healthcard_core::{CoreError, VerificationError};
use healthcard_qr::RenderError;
use thiserror::Error;

/// Errors that can occur while issuing or rendering a health card.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Payload, compression, signing, encoding or chunking failure.
    #[error("issuance error: {0}")]
    Core(#[from] CoreError),

    /// QR rendering failure.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Token verification failure.
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),
}

/// Result type for issuance operations.
pub type Result<T> = std::result::Result<T, IssueError>;
