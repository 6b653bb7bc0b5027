//! # Health Card QR
//!
//! Renders `shc:/` chunk payloads as QR symbols.
//!
//! Each symbol carries two segments: the `shc:/` (or `shc:/i/n/`) prefix in
//! byte mode and the digit string in numeric mode. The smallest version that
//! fits is chosen; nothing is cached between calls.

pub mod error;
pub mod render;

pub use error::{RenderError, Result};
pub use render::{render_chunk, render_plan, render_text, QrSymbol, RenderOptions};

pub use qrcode::{EcLevel, Version};
