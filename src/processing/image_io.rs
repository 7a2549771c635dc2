//! # PNG Container Adapter
//!
//! Converts between PNG files and [`PixelBuffer`]s. Decoding always expands to
//! RGBA8 so the codec sees four channels per pixel; encoding is lossless PNG,
//! since any lossy re-encode destroys the embedded bits.

use image::{ImageFormat, RgbaImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

use crate::common::error::{Result, StegoError};
use crate::processing::pixels::PixelBuffer;

/// Decode image bytes (any format supported by the `image` crate) into RGBA pixels.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)?;
    // Convert to RGBA format for consistent pixel manipulation
    let img = img.to_rgba8();
    let (width, height) = img.dimensions();
    debug!("Decoded {}x{} image ({} input bytes)", width, height, bytes.len());
    PixelBuffer::from_raw(width, height, img.into_raw())
}

/// Encode pixels as PNG bytes.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    let img = RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.as_bytes().to_vec())
        .ok_or_else(|| StegoError::InvalidInput("pixel data does not match dimensions".to_string()))?;

    let mut output_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
    Ok(output_bytes)
}

pub fn load_png(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_png(&bytes)
}

pub fn save_png(path: impl AsRef<Path>, pixels: &PixelBuffer) -> Result<()> {
    let bytes = encode_png(pixels)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let data = (0..width * height * 4).map(|i| (i % 256) as u8).collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn png_is_lossless() {
        let original = gradient(7, 5);
        let bytes = encode_png(&original).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode_png(&bytes).unwrap(), original);
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            decode_png(b"definitely not an image"),
            Err(StegoError::Image(_))
        ));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        let original = gradient(4, 4);
        save_png(&path, &original).unwrap();
        assert_eq!(load_png(&path).unwrap(), original);
    }
}
