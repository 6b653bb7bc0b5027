//! The Issuer: unified API for producing health cards.
//!
//! Wires the core pipeline and the QR renderer together behind two entry
//! points: issue a signed token, and turn a token into QR symbols.

use healthcard_core::{
    now_secs, plan_chunks, reassemble, sign_credential, verify_card, ChunkThresholds, Credential,
    KeySet, SignedToken, SigningIdentity,
};
use healthcard_qr::{render_plan, QrSymbol, RenderOptions};
use serde_json::Value;

use crate::error::Result;

/// Configuration for issuance and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssuerConfig {
    /// When and how tokens are split across symbols.
    pub thresholds: ChunkThresholds,
    /// QR rendering parameters.
    pub render: RenderOptions,
}

/// Input for a single issuance.
#[derive(Debug, Clone, Copy)]
pub struct IssueCardInput<'a> {
    pub issuer_url: &'a str,
    pub signing_identity: &'a SigningIdentity,
    pub claim: &'a Value,
    /// Explicit issuance instant (Unix seconds); defaults to now.
    pub issued_at: Option<i64>,
}

impl<'a> IssueCardInput<'a> {
    pub fn new(issuer_url: &'a str, signing_identity: &'a SigningIdentity, claim: &'a Value) -> Self {
        Self {
            issuer_url,
            signing_identity,
            claim,
            issued_at: None,
        }
    }

    /// Pin the issuance instant.
    pub fn issued_at(mut self, secs: i64) -> Self {
        self.issued_at = Some(secs);
        self
    }
}

/// Build, canonicalize, compress and sign one credential.
pub fn issue_card(input: &IssueCardInput<'_>) -> Result<SignedToken> {
    let credential = Credential::builder(input.issuer_url)
        .issued_at(input.issued_at.unwrap_or_else(now_secs))
        .claim(input.claim)
        .build()?;

    let token = sign_credential(&credential, input.signing_identity)?;

    tracing::debug!(
        kid = input.signing_identity.key_id(),
        token_len = token.len(),
        "issued card"
    );
    Ok(token)
}

/// Chunk a signed token and render every chunk as a QR symbol.
pub fn generate_qr(token: &SignedToken, config: &IssuerConfig) -> Result<Vec<QrSymbol>> {
    let plan = plan_chunks(token.as_str(), &config.thresholds)?;
    let symbols = render_plan(&plan, &config.render)?;

    tracing::debug!(
        token_len = token.len(),
        chunks = symbols.len(),
        "generated qr symbols"
    );
    Ok(symbols)
}

/// Rebuild a signed token from scanned `shc:/` texts, in any order.
pub fn decode_qr<S: AsRef<str>>(texts: &[S]) -> Result<SignedToken> {
    let compact = reassemble(texts)?;
    Ok(SignedToken::parse(compact)?)
}

/// An issuer bound to one signing identity and base URL.
///
/// Holds no mutable state; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct Issuer {
    identity: SigningIdentity,
    issuer_url: String,
    config: IssuerConfig,
}

impl Issuer {
    /// Create a new issuer.
    pub fn new(identity: SigningIdentity, issuer_url: impl Into<String>, config: IssuerConfig) -> Self {
        Self {
            identity,
            issuer_url: issuer_url.into(),
            config,
        }
    }

    /// The signing identity.
    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Issue a card stamped with the current time.
    pub fn issue(&self, claim: &Value) -> Result<SignedToken> {
        issue_card(&IssueCardInput::new(&self.issuer_url, &self.identity, claim))
    }

    /// Issue a card with an explicit issuance instant.
    pub fn issue_at(&self, claim: &Value, issued_at: i64) -> Result<SignedToken> {
        issue_card(&IssueCardInput::new(&self.issuer_url, &self.identity, claim).issued_at(issued_at))
    }

    /// Render a token with this issuer's configuration.
    pub fn generate_qr(&self, token: &SignedToken) -> Result<Vec<QrSymbol>> {
        generate_qr(token, &self.config)
    }

    /// Issue a card and render it in one step.
    pub fn issue_qr(&self, claim: &Value) -> Result<(SignedToken, Vec<QrSymbol>)> {
        let token = self.issue(claim)?;
        let symbols = self.generate_qr(&token)?;
        Ok((token, symbols))
    }

    /// Verify a token against this issuer's public key.
    pub fn verify(&self, token: &str) -> Result<Credential> {
        Ok(verify_card(token, &self.identity.public_key())?)
    }

    /// The key set to publish at `{iss}/.well-known/jwks.json`.
    pub fn key_set(&self) -> KeySet {
        KeySet::new().with_identity(&self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueError;
    use healthcard_core::CoreError;
    use serde_json::json;

    fn issuer() -> Issuer {
        let identity = SigningIdentity::from_secret_bytes(&[0x11; 32], "k1").unwrap();
        Issuer::new(identity, "https://example.org/issuer", IssuerConfig::default())
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let claim = json!({"type": "test"});

        let token = issuer.issue_at(&claim, 1_736_870_400).unwrap();
        let credential = issuer.verify(token.as_str()).unwrap();

        assert_eq!(credential.issuer_url, "https://example.org/issuer");
        assert_eq!(credential.issued_at, 1_736_870_400);
        assert_eq!(credential.claim, claim);
    }

    #[test]
    fn test_issue_defaults_to_now() {
        let issuer = issuer();
        let before = now_secs();
        let token = issuer.issue(&json!({"type": "test"})).unwrap();
        let after = now_secs();

        let issued_at = issuer.verify(token.as_str()).unwrap().issued_at;
        assert!((before..=after).contains(&issued_at));
    }

    #[test]
    fn test_invalid_issuer_url() {
        let identity = SigningIdentity::from_secret_bytes(&[0x11; 32], "k1").unwrap();
        let issuer = Issuer::new(identity, "https://example.org/issuer/", IssuerConfig::default());

        let result = issuer.issue(&json!({}));
        assert!(matches!(
            result,
            Err(IssueError::Core(CoreError::InvalidCredential(_)))
        ));
    }

    #[test]
    fn test_issue_qr_single_symbol() {
        let (token, symbols) = issuer().issue_qr(&json!({"type": "test"})).unwrap();

        assert_eq!(symbols.len(), 1);
        assert!(symbols[0].text().starts_with("shc:/"));
        assert_eq!(decode_qr(&[symbols[0].text()]).unwrap(), token);
    }

    #[test]
    fn test_key_set_contains_kid() {
        let issuer = issuer();
        let keys = issuer.key_set();
        let jwk = keys.find("k1").unwrap();

        assert_eq!(jwk.to_public_key().unwrap(), issuer.identity().public_key());
    }

    #[test]
    fn test_decode_qr_rejects_non_token() {
        // "abc" has no dots, so it is not a compact JWS.
        let digits = healthcard_core::numeric::encode("abc").unwrap();
        let result = decode_qr(&[format!("shc:/{digits}")]);
        assert!(matches!(result, Err(IssueError::Verification(_))));
    }
}
