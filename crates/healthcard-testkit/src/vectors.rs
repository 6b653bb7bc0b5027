//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the encodings that scanners and verifiers depend on:
//! numeric digit pairs, chunk boundaries and the JWS header segment.

use healthcard_core::{
    numeric, plan_chunks, ChunkThresholds, JwsHeader, MAX_CHUNK_SIZE, MAX_SINGLE_JWS_SIZE,
};

/// base64url of `{"alg":"ES256","zip":"DEF","kid":"k1"}`.
pub const HEADER_K1_B64: &str = "eyJhbGciOiJFUzI1NiIsInppcCI6IkRFRiIsImtpZCI6ImsxIn0";

/// A numeric encoding vector.
#[derive(Debug, Clone)]
pub struct NumericVector {
    pub name: &'static str,
    pub input: &'static str,
    pub digits: &'static str,
}

/// A chunk-plan vector: token length to expected chunk count.
#[derive(Debug, Clone)]
pub struct ChunkVector {
    pub name: &'static str,
    pub token_len: usize,
    pub expected_chunks: usize,
}

/// Get all numeric encoding vectors.
pub fn numeric_vectors() -> Vec<NumericVector> {
    vec![
        NumericVector { name: "lowest", input: "-", digits: "00" },
        NumericVector { name: "dot", input: ".", digits: "01" },
        NumericVector { name: "digit zero", input: "0", digits: "03" },
        NumericVector { name: "upper A", input: "A", digits: "20" },
        NumericVector { name: "underscore", input: "_", digits: "50" },
        NumericVector { name: "highest token char", input: "z", digits: "77" },
        NumericVector { name: "header start", input: "ey", digits: "5676" },
        NumericVector {
            name: "ES256 header prefix",
            input: "eyJhbGciOiJFUzI1NiJ9",
            digits: "5676295953265460346029254077280433602912",
        },
        NumericVector {
            name: "three segments",
            input: "abc.def.ghi",
            digits: "5253540155565701585960",
        },
    ]
}

/// Get all chunk-plan vectors under the default thresholds.
pub fn chunk_vectors() -> Vec<ChunkVector> {
    vec![
        ChunkVector { name: "tiny", token_len: 1, expected_chunks: 1 },
        ChunkVector {
            name: "exactly single size",
            token_len: MAX_SINGLE_JWS_SIZE,
            expected_chunks: 1,
        },
        ChunkVector {
            name: "one over single size",
            token_len: MAX_SINGLE_JWS_SIZE + 1,
            expected_chunks: 2,
        },
        ChunkVector {
            name: "two full chunks",
            token_len: 2 * MAX_CHUNK_SIZE,
            expected_chunks: 2,
        },
        ChunkVector {
            name: "two full chunks plus one",
            token_len: 2 * MAX_CHUNK_SIZE + 1,
            expected_chunks: 3,
        },
        ChunkVector {
            name: "three full chunks",
            token_len: 3 * MAX_CHUNK_SIZE,
            expected_chunks: 3,
        },
    ]
}

/// The expected header segment for `kid = "k1"`.
pub fn header_vector() -> (&'static str, JwsHeader) {
    (HEADER_K1_B64, JwsHeader::for_key("k1"))
}

/// A token-alphabet string of the given length.
pub fn token_of_len(len: usize) -> String {
    "eyJhbGciOiJFUzI1NiJ9.ABCxyz-_0123456789"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// Check every vector against the implementation.
///
/// Returns `(name, matches, got)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let thresholds = ChunkThresholds::default();

    let encodings = numeric_vectors().into_iter().map(|v| {
        let got = numeric::encode(v.input).unwrap_or_else(|e| e.to_string());
        (v.name.to_string(), got == v.digits, got)
    });

    let chunks = chunk_vectors().into_iter().map(|v| {
        let got = plan_chunks(&token_of_len(v.token_len), &thresholds)
            .map(|plan| plan.len().to_string())
            .unwrap_or_else(|e| e.to_string());
        (v.name.to_string(), got == v.expected_chunks.to_string(), got)
    });

    encodings.chain(chunks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthcard_core::{sign_compact, SigningIdentity};

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, got) in verify_all_vectors() {
            assert!(matches, "vector '{name}' mismatched: got {got}");
        }
    }

    #[test]
    fn test_numeric_vectors_decode() {
        for vector in numeric_vectors() {
            assert_eq!(
                numeric::decode(vector.digits).unwrap(),
                vector.input,
                "vector '{}'",
                vector.name
            );
        }
    }

    #[test]
    fn test_header_segment_matches() {
        let (expected, header) = header_vector();
        let identity = SigningIdentity::from_secret_bytes(&[0x42; 32], "k1").unwrap();
        let token = sign_compact(b"payload", &identity).unwrap();

        assert_eq!(token.segments().0, expected);
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"ES256","zip":"DEF","kid":"k1"}"#
        );
    }
}
