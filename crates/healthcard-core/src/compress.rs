//! Raw DEFLATE (RFC 1951) compression of the signed payload.
//!
//! The JWS header declares `zip: DEF`, so verifiers invert this with a raw
//! inflate. A zlib or gzip wrapper would make the card unverifiable.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{Result, VerificationError};

/// Compress bytes with raw DEFLATE at the maximum compression level.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    tracing::debug!(
        input_len = data.len(),
        compressed_len = compressed.len(),
        "deflated payload"
    );
    Ok(compressed)
}

/// Decompress a raw DEFLATE stream.
pub fn inflate(data: &[u8]) -> std::result::Result<Vec<u8>, VerificationError> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(VerificationError::Decompression)?;
    Ok(out)
}
