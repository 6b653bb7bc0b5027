//! Chunking of oversized tokens across several QR symbols.
//!
//! Splitting always happens on the compact token *before* numeric expansion.
//! Each slice is then encoded on its own, so a two-digit group can never
//! straddle two chunks.
//!
//! QR text forms:
//! - single chunk: `shc:/` + digits
//! - multi chunk:  `shc:/{index}/{total}/` + digits (1-based index)

use crate::error::{CoreError, Result};
use crate::numeric;

/// Scheme prefix of every health card QR payload.
pub const QR_SCHEME: &str = "shc:/";

/// Longest compact token that is still rendered as a single symbol.
pub const MAX_SINGLE_JWS_SIZE: usize = 1195;

/// Longest token slice placed in one symbol when splitting.
pub const MAX_CHUNK_SIZE: usize = 1191;

/// Size thresholds driving the chunk plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkThresholds {
    /// Maximum token length eligible for a single symbol.
    pub max_single_jws_size: usize,
    /// Maximum token characters per chunk when splitting.
    pub max_chunk_size: usize,
}

impl Default for ChunkThresholds {
    fn default() -> Self {
        Self {
            max_single_jws_size: MAX_SINGLE_JWS_SIZE,
            max_chunk_size: MAX_CHUNK_SIZE,
        }
    }
}

impl ChunkThresholds {
    fn validate(&self) -> Result<()> {
        if self.max_single_jws_size == 0 || self.max_chunk_size == 0 {
            return Err(CoreError::ChunkPlan(format!(
                "thresholds must be non-zero: {self:?}"
            )));
        }
        if self.max_chunk_size > self.max_single_jws_size {
            return Err(CoreError::ChunkPlan(format!(
                "max_chunk_size {} exceeds max_single_jws_size {}",
                self.max_chunk_size, self.max_single_jws_size
            )));
        }
        Ok(())
    }
}

/// One independently renderable segment of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: usize,
    total: usize,
    token_slice: String,
    digits: String,
}

impl Chunk {
    /// 1-based position of this chunk.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of chunks in the plan.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The slice of the compact token carried by this chunk.
    pub fn token_slice(&self) -> &str {
        &self.token_slice
    }

    /// The numeric encoding of the token slice.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The literal prefix: `shc:/` or `shc:/{index}/{total}/`.
    pub fn prefix(&self) -> String {
        if self.total == 1 {
            QR_SCHEME.to_string()
        } else {
            format!("{QR_SCHEME}{}/{}/", self.index, self.total)
        }
    }

    /// The full text encoded into the QR symbol.
    pub fn qr_text(&self) -> String {
        let mut text = self.prefix();
        text.push_str(&self.digits);
        text
    }
}

/// The ordered set of chunks for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    chunks: Vec<Chunk>,
}

impl ChunkPlan {
    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Never true for a plan built by [`plan_chunks`].
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the token fits a single symbol.
    pub fn is_single(&self) -> bool {
        self.chunks.len() == 1
    }

    /// The chunks in index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// QR texts in index order.
    pub fn qr_texts(&self) -> Vec<String> {
        self.chunks.iter().map(Chunk::qr_text).collect()
    }

    /// Concatenate the token slices back into the compact token.
    pub fn token(&self) -> String {
        self.chunks.iter().map(|c| c.token_slice.as_str()).collect()
    }

    fn check_invariants(&self) -> Result<()> {
        let total = self.chunks.len();
        if total == 0 {
            return Err(CoreError::ChunkPlan("plan has zero chunks".into()));
        }
        for (position, chunk) in self.chunks.iter().enumerate() {
            if chunk.total != total {
                return Err(CoreError::ChunkPlan(format!(
                    "chunk {} claims total {}, plan has {total}",
                    chunk.index, chunk.total
                )));
            }
            if chunk.index != position + 1 || chunk.index > total {
                return Err(CoreError::ChunkPlan(format!(
                    "chunk index {} out of range [1,{total}] at position {position}",
                    chunk.index
                )));
            }
        }
        Ok(())
    }
}

impl IntoIterator for ChunkPlan {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

/// Decide how a compact token is split across QR symbols.
pub fn plan_chunks(token: &str, thresholds: &ChunkThresholds) -> Result<ChunkPlan> {
    thresholds.validate()?;

    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Err(CoreError::ChunkPlan("cannot plan an empty token".into()));
    }

    let slices: Vec<&[char]> = if len <= thresholds.max_single_jws_size {
        vec![chars.as_slice()]
    } else {
        chars.chunks(thresholds.max_chunk_size).collect()
    };

    let total = slices.len();
    let chunks = slices
        .into_iter()
        .enumerate()
        .map(|(i, slice)| {
            let token_slice: String = slice.iter().collect();
            let digits = numeric::encode(&token_slice)?;
            Ok(Chunk {
                index: i + 1,
                total,
                token_slice,
                digits,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let plan = ChunkPlan { chunks };
    plan.check_invariants()?;

    if plan.is_single() {
        tracing::debug!(token_len = len, "token fits a single symbol");
    } else {
        tracing::warn!(
            token_len = len,
            chunks = total,
            max_single = thresholds.max_single_jws_size,
            "token split across multiple symbols"
        );
    }
    Ok(plan)
}

/// A parsed `shc:/` QR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub index: usize,
    pub total: usize,
    pub digits: String,
}

/// Parse `shc:/digits` or `shc:/{index}/{total}/digits`.
pub fn parse_qr_text(text: &str) -> Result<QrPayload> {
    let rest = text
        .strip_prefix(QR_SCHEME)
        .ok_or_else(|| CoreError::Decoding(format!("missing {QR_SCHEME} prefix")))?;

    let (index, total, digits) = if rest.contains('/') {
        let mut parts = rest.splitn(3, '/');
        let (index, total, digits) = match (parts.next(), parts.next(), parts.next()) {
            (Some(i), Some(n), Some(d)) => (i, n, d),
            _ => return Err(CoreError::Decoding("malformed chunk prefix".into())),
        };
        let index = parse_position("index", index)?;
        let total = parse_position("total", total)?;
        if total < 2 {
            return Err(CoreError::Decoding(format!(
                "chunked prefix requires total >= 2, got {total}"
            )));
        }
        if index > total {
            return Err(CoreError::Decoding(format!(
                "chunk index {index} exceeds total {total}"
            )));
        }
        (index, total, digits)
    } else {
        (1, 1, rest)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Decoding("payload must be non-empty digits".into()));
    }
    if digits.len() % 2 != 0 {
        return Err(CoreError::Decoding(format!(
            "digit payload has odd length {}",
            digits.len()
        )));
    }

    Ok(QrPayload {
        index,
        total,
        digits: digits.to_string(),
    })
}

/// Positions are plain decimal: no sign, no leading zero.
fn parse_position(name: &str, value: &str) -> Result<usize> {
    let canonical = value.bytes().all(|b| b.is_ascii_digit()) && !value.starts_with('0');
    match value.parse::<usize>() {
        Ok(n) if canonical && n >= 1 => Ok(n),
        _ => Err(CoreError::Decoding(format!("invalid chunk {name}: {value:?}"))),
    }
}

/// Rebuild the compact token from scanned QR texts, in any order.
pub fn reassemble<S: AsRef<str>>(texts: &[S]) -> Result<String> {
    let payloads = texts
        .iter()
        .map(|t| parse_qr_text(t.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let total = match payloads.first() {
        Some(first) => first.total,
        None => return Err(CoreError::ChunkPlan("no chunks to reassemble".into())),
    };
    if payloads.iter().any(|p| p.total != total) {
        return Err(CoreError::ChunkPlan("chunks disagree on total".into()));
    }

    let mut slots: Vec<Option<&QrPayload>> = vec![None; total];
    for payload in &payloads {
        let slot = &mut slots[payload.index - 1];
        if slot.is_some() {
            return Err(CoreError::ChunkPlan(format!(
                "duplicate chunk {}",
                payload.index
            )));
        }
        *slot = Some(payload);
    }

    let mut token = String::new();
    for (i, slot) in slots.iter().enumerate() {
        let payload =
            slot.ok_or_else(|| CoreError::ChunkPlan(format!("missing chunk {}", i + 1)))?;
        token.push_str(&numeric::decode(&payload.digits)?);
    }
    Ok(token)
}
