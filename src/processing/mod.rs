//! # Image Processing and Steganography
//!
//! This module hides and recovers byte blobs in RGBA pixel data using LSB
//! (Least Significant Bit) steganography.
//!
//! - [`pixels`]: the RGBA buffer type the codec works on
//! - [`steganography`]: the bit-plane codec itself
//! - [`image_io`]: PNG decode/encode around it

pub mod image_io;
pub mod pixels;
pub mod steganography;

// Re-export main items for convenience
pub use pixels::PixelBuffer;
pub use steganography::{read, write};
