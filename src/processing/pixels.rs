//! RGBA pixel buffer handed between the PNG adapter and the bit-plane codec.

use crate::common::error::{Result, StegoError};

/// Interleaved 8-bit channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA samples, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking they match the stated dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| StegoError::InvalidInput("image dimensions overflow".to_string()))?;

        if data.len() != expected {
            return Err(StegoError::InvalidInput(format!(
                "{}x{} RGBA image needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Single-row buffer from raw channel bytes; the length must be a multiple of 4.
    pub fn from_channels(data: Vec<u8>) -> Result<Self> {
        if data.len() % CHANNELS != 0 {
            return Err(StegoError::InvalidInput(format!(
                "channel count {} is not a multiple of {}",
                data.len(),
                CHANNELS
            )));
        }
        let width = u32::try_from(data.len() / CHANNELS)
            .map_err(|_| StegoError::InvalidInput("image too wide".to_string()))?;
        let height = if width == 0 { 0 } else { 1 };
        Self::from_raw(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total channel bytes, which is also the capacity in bits.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
