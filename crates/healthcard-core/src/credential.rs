//! Credential: the claim structure that gets signed into a health card.
//!
//! A credential is built fresh for every issuance and never mutated
//! afterwards. Its serialized form uses three fixed top-level keys:
//! `iss`, `nbf` and `vc`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// The issued credential: issuer, issuance instant and the opaque claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Issuer base URL. Verifiers resolve `{iss}/.well-known/jwks.json`.
    #[serde(rename = "iss")]
    pub issuer_url: String,

    /// Issuance instant (Unix seconds).
    #[serde(rename = "nbf")]
    pub issued_at: i64,

    /// The verifiable credential claim, passed through untouched.
    #[serde(rename = "vc")]
    pub claim: Value,
}

impl Credential {
    /// Start building a credential for the given issuer.
    pub fn builder(issuer_url: impl Into<String>) -> CredentialBuilder {
        CredentialBuilder::new(issuer_url)
    }
}

/// Builder for [`Credential`].
///
/// The issuance instant defaults to the current time in whole seconds.
pub struct CredentialBuilder {
    issuer_url: String,
    issued_at: Option<i64>,
    claim: Option<std::result::Result<Value, serde_json::Error>>,
}

impl CredentialBuilder {
    /// Start building a credential.
    pub fn new(issuer_url: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            issued_at: None,
            claim: None,
        }
    }

    /// Set the issuance instant (Unix seconds).
    pub fn issued_at(mut self, secs: i64) -> Self {
        self.issued_at = Some(secs);
        self
    }

    /// Set the claim from any serializable value.
    ///
    /// Conversion errors are reported by [`build`](Self::build).
    pub fn claim<T: Serialize + ?Sized>(mut self, claim: &T) -> Self {
        self.claim = Some(serde_json::to_value(claim));
        self
    }

    /// Set the claim from an already-parsed JSON value.
    pub fn claim_value(mut self, claim: Value) -> Self {
        self.claim = Some(Ok(claim));
        self
    }

    /// Validate inputs and produce the credential.
    pub fn build(self) -> Result<Credential> {
        validate_issuer_url(&self.issuer_url)?;

        let claim = match self.claim {
            Some(Ok(value)) => value,
            Some(Err(e)) => return Err(CoreError::serialization("claim", e)),
            None => return Err(CoreError::InvalidCredential("missing claim".into())),
        };

        Ok(Credential {
            issuer_url: self.issuer_url,
            issued_at: self.issued_at.unwrap_or_else(now_secs),
            claim,
        })
    }
}

/// `iss` must be a non-empty URL without a trailing slash.
fn validate_issuer_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(CoreError::InvalidCredential("issuer url is empty".into()));
    }
    if url.ends_with('/') {
        return Err(CoreError::InvalidCredential(format!(
            "issuer url must not end with '/': {url}"
        )));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidCredential(format!(
            "issuer url contains whitespace: {url:?}"
        )));
    }
    Ok(())
}

/// Current time in Unix seconds.
pub fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
