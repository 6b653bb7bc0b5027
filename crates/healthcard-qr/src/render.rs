//! QR symbol construction and image export.

use std::fmt;
use std::io::{Cursor, Write};

use healthcard_core::chunk::{parse_qr_text, Chunk, ChunkPlan};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::bits::Bits;
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use crate::error::{RenderError, Result};

/// Highest standard QR version.
const MAX_VERSION: i16 = 40;

/// Rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Error-correction level. L maximizes capacity.
    pub ec_level: EcLevel,
    /// Pixels per module in raster output.
    pub module_scale: u32,
    /// Surround the symbol with the standard 4-module quiet zone.
    pub quiet_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::L,
            module_scale: 4,
            quiet_zone: true,
        }
    }
}

/// A rendered QR symbol and the exact text it encodes.
pub struct QrSymbol {
    text: String,
    index: usize,
    total: usize,
    code: QrCode,
    options: RenderOptions,
}

impl QrSymbol {
    /// The `shc:/...` text encoded in the symbol.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based chunk index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total chunks for the card.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The QR version chosen.
    pub fn version(&self) -> Version {
        self.code.version()
    }

    /// The QR version as a number (1..=40).
    pub fn version_number(&self) -> i16 {
        match self.code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        }
    }

    /// Width in modules, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// The underlying symbol.
    pub fn code(&self) -> &QrCode {
        &self.code
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let image = self
            .code
            .render::<Luma<u8>>()
            .module_dimensions(self.options.module_scale, self.options.module_scale)
            .quiet_zone(self.options.quiet_zone)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Write PNG bytes to a sink.
    pub fn write_png<W: Write>(&self, mut sink: W) -> Result<()> {
        let png = self.to_png()?;
        sink.write_all(&png)?;
        sink.flush()?;
        Ok(())
    }

    /// Encode as an SVG document.
    pub fn to_svg(&self) -> String {
        self.code
            .render::<svg::Color<'_>>()
            .module_dimensions(self.options.module_scale, self.options.module_scale)
            .quiet_zone(self.options.quiet_zone)
            .build()
    }
}

impl fmt::Debug for QrSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrSymbol")
            .field("index", &self.index)
            .field("total", &self.total)
            .field("version", &self.version_number())
            .field("text_len", &self.text.len())
            .finish()
    }
}

/// Render one `shc:/` text into a QR symbol.
pub fn render_text(text: &str, options: &RenderOptions) -> Result<QrSymbol> {
    let payload =
        parse_qr_text(text).map_err(|e| RenderError::InvalidPayload(e.to_string()))?;
    let prefix = &text[..text.len() - payload.digits.len()];

    let code = encode_smallest(prefix, &payload.digits, options.ec_level).ok_or(
        RenderError::Capacity {
            length: text.len(),
            ec_level: options.ec_level,
        },
    )??;

    tracing::debug!(
        index = payload.index,
        total = payload.total,
        version = ?code.version(),
        text_len = text.len(),
        "rendered qr symbol"
    );

    Ok(QrSymbol {
        text: text.to_string(),
        index: payload.index,
        total: payload.total,
        code,
        options: *options,
    })
}

/// Render a single planned chunk.
pub fn render_chunk(chunk: &Chunk, options: &RenderOptions) -> Result<QrSymbol> {
    render_text(&chunk.qr_text(), options)
}

/// Render every chunk of a plan, in index order.
pub fn render_plan(plan: &ChunkPlan, options: &RenderOptions) -> Result<Vec<QrSymbol>> {
    plan.chunks()
        .iter()
        .map(|chunk| render_chunk(chunk, options))
        .collect()
}

/// Try versions in ascending order; `None` when nothing fits.
fn encode_smallest(prefix: &str, digits: &str, ec_level: EcLevel) -> Option<Result<QrCode>> {
    for version in 1..=MAX_VERSION {
        match encode_at(version, prefix, digits, ec_level) {
            Ok(bits) => {
                return Some(
                    QrCode::with_bits(bits, ec_level)
                        .map_err(|e| RenderError::InvalidPayload(e.to_string())),
                )
            }
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Some(Err(RenderError::InvalidPayload(e.to_string()))),
        }
    }
    None
}

fn encode_at(
    version: i16,
    prefix: &str,
    digits: &str,
    ec_level: EcLevel,
) -> std::result::Result<Bits, QrError> {
    let mut bits = Bits::new(Version::Normal(version));
    bits.push_byte_data(prefix.as_bytes())?;
    bits.push_numeric_data(digits.as_bytes())?;
    bits.push_terminator(ec_level)?;
    Ok(bits)
}
