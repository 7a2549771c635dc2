//! # Error Types
//!
//! [`StegoError`] covers every failure the library reports, from PNG decoding
//! through capacity checks to payload authentication.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, StegoError>;

/// Errors that can occur while sealing, embedding, reading or opening a payload.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The caller passed something unusable (empty image, oversized payload,
    /// mismatched pixel dimensions, a key that cannot open anything).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The image does not have enough channel bytes for the header plus payload.
    #[error("image too small: need {required_bits} bits but only {available_bits} available")]
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },

    /// Tag mismatch, wrong key, truncated blob or undecodable transport text.
    #[error("decryption failed (wrong key or corrupted data)")]
    AuthenticationFailure,

    /// The header decodes to an implausible length: the image carries no payload.
    #[error("no hidden data found in image")]
    NoEmbeddedData,

    /// The header length fits the image but cannot describe a whole-byte payload.
    #[error("hidden data header is corrupt ({payload_bits} bits)")]
    CorruptHeader { payload_bits: u32 },

    /// PNG container could not be decoded or encoded.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file missing, malformed or outside allowed bounds.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StegoError {
    /// True for the "nothing recoverable here" family, as opposed to a
    /// payload that was found but failed to decrypt.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoEmbeddedData | Self::CorruptHeader { .. })
    }
}
