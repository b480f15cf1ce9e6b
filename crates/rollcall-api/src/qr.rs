//! Rendering a guest's identifier as a scannable QR code.

use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use rollcall_core::guest::Identifier;
use thiserror::Error;

/// Edge length of one module, in pixels.
const MODULE_PX: u32 = 10;

#[derive(Debug, Error)]
pub enum QrError {
  #[error("identifier does not fit in a QR code: {0}")]
  Encode(#[from] qrcode::types::QrError),

  #[error("PNG encoding failed: {0}")]
  Png(#[from] image::ImageError),
}

/// Encode `identifier` as a black-on-white PNG with a four-module quiet zone
/// and medium error correction. The payload is the bare identifier, exactly
/// what the scanner later posts back as `code`.
pub fn render_png(identifier: &Identifier) -> Result<Vec<u8>, QrError> {
  let image = QrCode::with_error_correction_level(identifier.as_str(), EcLevel::M)?
    .render::<Luma<u8>>()
    .quiet_zone(true)
    .module_dimensions(MODULE_PX, MODULE_PX)
    .build();

  let mut png = Vec::new();
  image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
  Ok(png)
}
