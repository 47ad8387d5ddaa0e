//! PNG output.  The codec is the `image` crate's; this only adapts a
//! `PixelBuffer` to it.

use image::png::PNGEncoder;
use image::ColorType;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::RenderError;
use crate::renderer::PixelBuffer;

/// The media type of everything `encode` produces.
pub const CONTENT_TYPE: &str = "image/png";

/// Encode a finished buffer into any writer.
pub fn write_png<W: Write>(output: W, buffer: &PixelBuffer) -> Result<(), RenderError> {
    PNGEncoder::new(output)
        .encode(
            buffer.as_bytes(),
            buffer.width() as u32,
            buffer.height() as u32,
            ColorType::RGBA(8),
        )
        .map_err(RenderError::Encode)
}

/// Encode a finished buffer into an in-memory PNG.
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, buffer)?;
    Ok(bytes)
}

/// Encode a finished buffer into a PNG file.
pub fn write_image<P: AsRef<Path>>(outfile: P, buffer: &PixelBuffer) -> Result<(), RenderError> {
    let output = File::create(outfile).map_err(RenderError::Encode)?;
    write_png(output, buffer)
}
