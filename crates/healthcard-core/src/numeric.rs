//! Numeric encoding of compact tokens for QR numeric mode.
//!
//! Each character becomes two decimal digits: `code_point - 45`, zero-padded.
//! This is a bijection between code points 45..=144 and 00..=99.

use crate::error::{CoreError, Result};

/// Offset subtracted from every code point (`-`).
pub const NUMERIC_OFFSET: u32 = 45;

/// Highest code point representable in two digits.
pub const NUMERIC_MAX: u32 = NUMERIC_OFFSET + 99;

/// Lowest code point a compact token may contain (`-`).
pub const TOKEN_CHAR_MIN: u32 = NUMERIC_OFFSET;

/// Highest code point a compact token may contain (`z`).
pub const TOKEN_CHAR_MAX: u32 = 'z' as u32;

/// Encode a string to its digit form.
///
/// Fails on the first character outside 45..=144 instead of truncating.
pub fn encode(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len() * 2);
    for (position, character) in s.chars().enumerate() {
        let code_point = character as u32;
        if !(NUMERIC_OFFSET..=NUMERIC_MAX).contains(&code_point) {
            return Err(CoreError::EncodingRange {
                stage: "numeric encode",
                character,
                code_point,
                position,
            });
        }
        let value = code_point - NUMERIC_OFFSET;
        out.push(digit(value / 10));
        out.push(digit(value % 10));
    }
    Ok(out)
}

/// Decode a digit string back to the original characters.
pub fn decode(digits: &str) -> Result<String> {
    let bytes = digits.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(CoreError::Decoding(format!(
            "digit string has odd length {}",
            bytes.len()
        )));
    }

    let mut out = String::with_capacity(bytes.len() / 2);
    for (index, pair) in bytes.chunks_exact(2).enumerate() {
        let (hi, lo) = match (decimal(pair[0]), decimal(pair[1])) {
            (Some(hi), Some(lo)) => (hi, lo),
            _ => {
                return Err(CoreError::Decoding(format!(
                    "non-digit at pair {index}"
                )))
            }
        };
        let code_point = hi * 10 + lo + NUMERIC_OFFSET;
        // 45..=144 are all valid scalar values.
        let character = char::from_u32(code_point).ok_or_else(|| {
            CoreError::Decoding(format!("invalid code point {code_point} at pair {index}"))
        })?;
        out.push(character);
    }
    Ok(out)
}

fn digit(value: u32) -> char {
    (b'0' + value as u8) as char
}

fn decimal(byte: u8) -> Option<u32> {
    byte.is_ascii_digit().then(|| u32::from(byte - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        assert_eq!(encode("-").unwrap(), "00");
        assert_eq!(encode(".").unwrap(), "01");
        assert_eq!(encode("0").unwrap(), "03");
        assert_eq!(encode("A").unwrap(), "20");
        assert_eq!(encode("_").unwrap(), "50");
        assert_eq!(encode("z").unwrap(), "77");
        assert_eq!(encode("ey").unwrap(), "5676");
    }

    #[test]
    fn test_window_edges() {
        let top = char::from_u32(NUMERIC_MAX).unwrap();
        assert_eq!(encode(&top.to_string()).unwrap(), "99");
        assert_eq!(decode("99").unwrap(), top.to_string());
    }

    #[test]
    fn test_below_window_fails() {
        let result = encode("ab,c");
        assert!(matches!(
            result,
            Err(CoreError::EncodingRange {
                character: ',',
                code_point: 44,
                position: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_above_window_fails() {
        let beyond = char::from_u32(NUMERIC_MAX + 1).unwrap();
        let result = encode(&format!("a{beyond}"));
        assert!(matches!(
            result,
            Err(CoreError::EncodingRange { position: 1, .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode("").unwrap(), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_decode_odd_length() {
        assert!(matches!(decode("123"), Err(CoreError::Decoding(_))));
    }

    #[test]
    fn test_decode_non_digit() {
        assert!(matches!(decode("12a4"), Err(CoreError::Decoding(_))));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_token_alphabet(s in "[A-Za-z0-9_.-]{0,400}") {
            let digits = encode(&s).unwrap();
            prop_assert_eq!(digits.len(), s.len() * 2);
            prop_assert!(digits.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(decode(&digits).unwrap(), s);
        }

        #[test]
        fn prop_roundtrip_full_window(codes in prop::collection::vec(45u32..=144, 0..200)) {
            let s: String = codes.iter().map(|c| char::from_u32(*c).unwrap()).collect();
            prop_assert_eq!(decode(&encode(&s).unwrap()).unwrap(), s);
        }

        #[test]
        fn prop_decode_encode_digits(pairs in prop::collection::vec(0u32..100, 0..200)) {
            let digits: String = pairs.iter().map(|p| format!("{p:02}")).collect();
            prop_assert_eq!(encode(&decode(&digits).unwrap()).unwrap(), digits);
        }
    }
}
