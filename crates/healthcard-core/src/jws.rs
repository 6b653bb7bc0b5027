//! Compact JWS signing (RFC 7515) with the fixed health card header.
//!
//! The token is `b64url(header) "." b64url(payload) "." b64url(signature)`
//! with no padding. The header is always exactly
//! `{"alg":"ES256","zip":"DEF","kid":<kid>}`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{PublicKey, SigningIdentity, ALG_ES256, SIGNATURE_LEN};
use crate::error::{CoreError, Result, VerificationError};
use crate::numeric::{TOKEN_CHAR_MAX, TOKEN_CHAR_MIN};

/// `zip` header value for raw DEFLATE payloads.
pub const ZIP_DEFLATE: &str = "DEF";

/// The JOSE header of a health card JWS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    pub alg: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JwsHeader {
    /// The fixed issuance header for a given key identifier.
    pub fn for_key(kid: &str) -> Self {
        Self {
            alg: ALG_ES256.to_string(),
            zip: Some(ZIP_DEFLATE.to_string()),
            kid: Some(kid.to_string()),
        }
    }
}

/// A compact signed token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignedToken(String);

impl SignedToken {
    /// Wrap an existing compact string after checking it has three segments.
    pub fn parse(s: impl Into<String>) -> std::result::Result<Self, VerificationError> {
        let s = s.into();
        split_compact(&s)?;
        Ok(Self(s))
    }

    /// The compact string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (the token is ASCII).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the compact string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The three dot-separated segments.
    pub fn segments(&self) -> (&str, &str, &str) {
        // Construction guarantees three segments.
        let mut parts = self.0.splitn(3, '.');
        (
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        )
    }

    /// Consume into the compact string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(24).collect();
        write!(f, "SignedToken({head}..., len={})", self.0.len())
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sign a compressed payload, producing a compact JWS.
pub fn sign_compact(compressed: &[u8], identity: &SigningIdentity) -> Result<SignedToken> {
    let header = JwsHeader::for_key(identity.key_id());
    let header_json =
        serde_json::to_vec(&header).map_err(|e| CoreError::serialization("jws header", e))?;

    let mut signing_input = URL_SAFE_NO_PAD.encode(header_json);
    signing_input.push('.');
    signing_input.push_str(&URL_SAFE_NO_PAD.encode(compressed));

    let signature = identity.sign(signing_input.as_bytes())?;

    let mut token = signing_input;
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(signature));

    ensure_token_alphabet(&token)?;

    tracing::debug!(kid = identity.key_id(), token_len = token.len(), "signed jws");
    Ok(SignedToken(token))
}

/// Check every character of a compact token against the numeric window.
///
/// base64url plus `.` stays within 45..=122 today; a header or algorithm
/// change that breaks this must fail here rather than during encoding.
pub fn ensure_token_alphabet(token: &str) -> Result<()> {
    for (position, character) in token.chars().enumerate() {
        let code_point = character as u32;
        if !(TOKEN_CHAR_MIN..=TOKEN_CHAR_MAX).contains(&code_point) {
            return Err(CoreError::EncodingRange {
                stage: "sign",
                character,
                code_point,
                position,
            });
        }
    }
    Ok(())
}

/// Split a compact JWS into its three segments.
pub fn split_compact(token: &str) -> std::result::Result<(&str, &str, &str), VerificationError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s), None) if !h.is_empty() && !s.is_empty() => Ok((h, p, s)),
        _ => Err(VerificationError::MalformedToken(
            "expected three dot-separated segments".into(),
        )),
    }
}

/// A token whose signature has been checked.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub header: JwsHeader,
    /// The still-compressed payload.
    pub payload: Bytes,
}

/// Verify a compact token's header and signature.
pub fn verify_compact(
    token: &str,
    key: &PublicKey,
) -> std::result::Result<VerifiedToken, VerificationError> {
    let (header_b64, payload_b64, signature_b64) = split_compact(token)?;

    let header_json = decode_segment("header", header_b64)?;
    let header: JwsHeader = serde_json::from_slice(&header_json)
        .map_err(|e| VerificationError::MalformedToken(format!("header: {e}")))?;

    if header.alg != ALG_ES256 {
        return Err(VerificationError::UnsupportedHeader(format!(
            "alg {:?}",
            header.alg
        )));
    }
    if header.zip.as_deref() != Some(ZIP_DEFLATE) {
        return Err(VerificationError::UnsupportedHeader(format!(
            "zip {:?}",
            header.zip
        )));
    }

    let signature = decode_segment("signature", signature_b64)?;
    if signature.len() != SIGNATURE_LEN {
        return Err(VerificationError::SignatureMismatch);
    }

    let signing_input_len = header_b64.len() + 1 + payload_b64.len();
    key.verify(token[..signing_input_len].as_bytes(), &signature)?;

    let payload = decode_segment("payload", payload_b64)?;
    Ok(VerifiedToken {
        header,
        payload: payload.into(),
    })
}

fn decode_segment(name: &str, segment: &str) -> std::result::Result<Vec<u8>, VerificationError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| VerificationError::MalformedToken(format!("{name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SigningIdentity {
        SigningIdentity::from_secret_bytes(&[0x42; 32], "k1").unwrap()
    }

    #[test]
    fn test_header_json_shape() {
        let json = serde_json::to_string(&JwsHeader::for_key("k1")).unwrap();
        assert_eq!(json, r#"{"alg":"ES256","zip":"DEF","kid":"k1"}"#);
    }

    #[test]
    fn test_sign_produces_three_segments() {
        let token = sign_compact(b"compressed", &identity()).unwrap();
        let (h, p, s) = token.segments();

        assert!(!h.is_empty());
        assert_eq!(URL_SAFE_NO_PAD.decode(p).unwrap(), b"compressed");
        assert_eq!(URL_SAFE_NO_PAD.decode(s).unwrap().len(), SIGNATURE_LEN);
        assert!(!token.as_str().contains('='));
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let identity = identity();
        let token = sign_compact(b"payload bytes", &identity).unwrap();

        let verified = verify_compact(token.as_str(), &identity.public_key()).unwrap();
        assert_eq!(verified.header, JwsHeader::for_key("k1"));
        assert_eq!(verified.payload.as_ref(), b"payload bytes");
    }

    #[test]
    fn test_verify_with_other_key_fails() {
        let token = sign_compact(b"payload", &identity()).unwrap();
        let other = SigningIdentity::generate("k2");

        let result = verify_compact(token.as_str(), &other.public_key());
        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let identity = identity();
        let token = sign_compact(b"payload", &identity).unwrap();
        let (h, _, s) = token.segments();
        let forged = format!("{h}.{}.{s}", URL_SAFE_NO_PAD.encode(b"forged"));

        let result = verify_compact(&forged, &identity.public_key());
        assert!(matches!(result, Err(VerificationError::SignatureMismatch)));
    }

    #[test]
    fn test_token_alphabet_in_range() {
        let token = sign_compact(&[0xffu8; 300], &identity()).unwrap();
        assert!(token
            .as_str()
            .chars()
            .all(|c| (45..=122).contains(&(c as u32))));
    }

    #[test]
    fn test_alphabet_violation_reported() {
        let result = ensure_token_alphabet("abc.d+f.ghi");
        assert!(matches!(
            result,
            Err(CoreError::EncodingRange {
                stage: "sign",
                character: '+',
                code_point: 43,
                position: 5,
            })
        ));
    }

    #[test]
    fn test_split_rejects_wrong_segment_count() {
        assert!(split_compact("a.b").is_err());
        assert!(split_compact("a.b.c.d").is_err());
        assert!(split_compact("a.b.c").is_ok());
    }

    #[test]
    fn test_unsupported_alg_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","zip":"DEF"}"#);
        let token = format!("{header}.AAAA.AAAA");
        let result = verify_compact(&token, &identity().public_key());
        assert!(matches!(result, Err(VerificationError::UnsupportedHeader(_))));
    }

    #[test]
    fn test_missing_zip_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256"}"#);
        let token = format!("{header}.AAAA.AAAA");
        let result = verify_compact(&token, &identity().public_key());
        assert!(matches!(result, Err(VerificationError::UnsupportedHeader(_))));
    }

    #[test]
    fn test_signed_token_parse() {
        assert!(SignedToken::parse("a.b.c").is_ok());
        assert!(SignedToken::parse("not-a-token").is_err());
    }
}
