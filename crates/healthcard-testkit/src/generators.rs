//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use healthcard_core::{sign_credential, Credential, SignedToken, SigningIdentity};

/// Generate a random P-256 signing identity.
pub fn signing_identity() -> impl Strategy<Value = SigningIdentity> {
    (any::<[u8; 32]>(), kid()).prop_filter_map("invalid P-256 scalar", |(seed, kid)| {
        SigningIdentity::from_secret_bytes(&seed, kid).ok()
    })
}

/// Generate a key identifier.
pub fn kid() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,43}".prop_map(String::from)
}

/// Generate an issuance instant in Unix seconds.
pub fn issued_at() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Generate an issuer URL without a trailing slash.
pub fn issuer_url() -> impl Strategy<Value = String> {
    "https://[a-z]{1,12}\\.example(/[a-z0-9]{1,8}){0,2}".prop_map(String::from)
}

/// Generate an arbitrary JSON value for use as a claim.
pub fn claim_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,24}".prop_map(Value::String),
        "\\PC{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,10}", inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a string drawn from the compact-token alphabet.
pub fn token_chars(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::char::range('A', 'Z'),
            prop::char::range('a', 'z'),
            prop::char::range('0', '9'),
            Just('-'),
            Just('_'),
            Just('.'),
        ],
        1..=max_len,
    )
    .prop_map(|chars| chars.into_iter().collect::<String>())
}

/// Generate a string of any code points in the numeric window (45..=144).
pub fn numeric_window_string(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(45u32..=144, 0..=max_len).prop_map(|codes| {
        codes
            .into_iter()
            .filter_map(char::from_u32)
            .collect::<String>()
    })
}

/// Parameters for generating a signed card.
#[derive(Debug, Clone)]
pub struct CardParams {
    pub identity: SigningIdentity,
    pub issuer_url: String,
    pub issued_at: i64,
    pub claim: Value,
}

impl Arbitrary for CardParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (signing_identity(), issuer_url(), issued_at(), claim_value())
            .prop_map(|(identity, issuer_url, issued_at, claim)| CardParams {
                identity,
                issuer_url,
                issued_at,
                claim,
            })
            .boxed()
    }
}

/// Build the credential described by the parameters.
pub fn credential_from_params(params: &CardParams) -> Credential {
    Credential::builder(&params.issuer_url)
        .issued_at(params.issued_at)
        .claim_value(params.claim.clone())
        .build()
        .expect("generated parameters are valid")
}

/// Sign the credential described by the parameters.
pub fn card_from_params(params: &CardParams) -> SignedToken {
    sign_credential(&credential_from_params(params), &params.identity)
        .expect("generated parameters sign")
}
