//! Output encoding.

use crate::error::{EngineError, EngineResult};
use darkroom_core::params::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Encode `img` into the requested format at the requested quality.
///
/// Quality is an encoder parameter only: it shapes JPEG compression and is
/// ignored for (lossless) PNG output. JPEG has no alpha channel, so the
/// image is flattened to RGB8 first.
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> EngineResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    if format.is_jpeg() {
        let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(EngineError::Encode)?;
    } else {
        img.write_to(&mut buf, ImageFormat::Png)
            .map_err(EngineError::Encode)?;
    }

    Ok(buf.into_inner())
}
