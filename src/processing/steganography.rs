//! # LSB Bit-Plane Codec
//!
//! Hides an opaque byte blob in the least significant bit of every channel
//! byte of an RGBA [`PixelBuffer`], and reads it back.
//!
//! ## Algorithm
//!
//! ### Encoding Process
//! 1. Prepend a 32-bit big-endian header holding the payload length **in bits**
//! 2. For each bit of header + payload (MSB first within each byte):
//!    - Take the next channel byte in buffer order (R → G → B → A → next pixel)
//!    - Clear its LSB
//!    - Set the LSB to the data bit
//! 3. Channel bytes past the last written bit are left untouched
//!
//! ### Decoding Process
//! 1. Read the LSBs of the first 32 channel bytes as the payload bit count
//! 2. Reject implausible counts (zero, or more than the image can carry)
//! 3. Read that many LSBs and pack them 8 at a time into bytes
//!
//! ### Capacity
//! One bit per channel byte, so a `w x h` image carries `w * h * 4` bits,
//! of which 32 go to the header.
//!
//! Example: an 800x600 image carries `(800 * 600 * 4 - 32) / 8` = ~240 KB.

use log::debug;

use crate::common::error::{Result, StegoError};
use crate::processing::pixels::PixelBuffer;

/// Width of the length header in bits.
pub const HEADER_BITS: usize = 32;

/// Channel bytes needed to carry a blob of `blob_len` bytes, header included.
pub fn required_bits(blob_len: usize) -> usize {
    HEADER_BITS.saturating_add(blob_len.saturating_mul(8))
}

/// Total bits the image can carry (one per channel byte).
pub fn capacity_bits(image: &PixelBuffer) -> usize {
    image.len()
}

/// Largest blob, in whole bytes, that fits after the header.
pub fn max_blob_len(image: &PixelBuffer) -> usize {
    image.len().saturating_sub(HEADER_BITS) / 8
}

/// Embed `blob` into a copy of `image`.
///
/// The input buffer is never modified; the returned buffer differs from it
/// only in the LSBs of the first `32 + 8 * blob.len()` channel bytes.
///
/// # Errors
/// - [`StegoError::InvalidInput`] if `blob` is empty (it would read back as "no data")
/// - [`StegoError::CapacityExceeded`] if the image has fewer channel bytes than bits to write
pub fn write(image: &PixelBuffer, blob: &[u8]) -> Result<PixelBuffer> {
    if blob.is_empty() {
        return Err(StegoError::InvalidInput("nothing to embed".to_string()));
    }

    let required = required_bits(blob.len());
    let available = capacity_bits(image);

    // The header can only describe up to u32::MAX payload bits.
    let header = u32::try_from(blob.len() * 8).map_err(|_| StegoError::CapacityExceeded {
        required_bits: required,
        available_bits: available,
    })?;

    if required > available {
        return Err(StegoError::CapacityExceeded {
            required_bits: required,
            available_bits: available,
        });
    }

    // Prepare data to embed: [4 bytes bit-length][blob bytes]
    let mut data_to_embed = Vec::with_capacity(HEADER_BITS / 8 + blob.len());
    data_to_embed.extend_from_slice(&header.to_be_bytes());
    data_to_embed.extend_from_slice(blob);

    let mut output = image.clone();
    for (i, channel) in output.as_bytes_mut()[..required].iter_mut().enumerate() {
        let bit = (data_to_embed[i / 8] >> (7 - i % 8)) & 1;
        *channel = (*channel & 0xFE) | bit;
    }

    debug!(
        "Embedded {} payload bits into {}x{} image ({}/{} channel bytes used)",
        header,
        image.width(),
        image.height(),
        required,
        available
    );

    Ok(output)
}

/// Extract the blob hidden by [`write`].
///
/// Returns `Ok(None)` when the header is implausible, which is what an
/// untouched image almost always looks like.
///
/// # Errors
/// - [`StegoError::CorruptHeader`] if the header fits the image but is not a whole number of bytes
pub fn read(image: &PixelBuffer) -> Result<Option<Vec<u8>>> {
    let channels = image.as_bytes();
    if channels.len() < HEADER_BITS {
        debug!("Image has {} channel bytes, too few for a header", channels.len());
        return Ok(None);
    }

    let payload_bits = channels[..HEADER_BITS]
        .iter()
        .fold(0u32, |acc, channel| (acc << 1) | u32::from(channel & 1));

    let available = channels.len() - HEADER_BITS;
    if payload_bits == 0 || payload_bits as usize > available {
        debug!(
            "Header claims {} payload bits, image carries {}; treating as no data",
            payload_bits, available
        );
        return Ok(None);
    }

    if payload_bits % 8 != 0 {
        return Err(StegoError::CorruptHeader { payload_bits });
    }

    let payload_bits = payload_bits as usize;
    let mut blob = vec![0u8; payload_bits / 8];
    for (i, channel) in channels[HEADER_BITS..HEADER_BITS + payload_bits]
        .iter()
        .enumerate()
    {
        blob[i / 8] |= (channel & 1) << (7 - i % 8);
    }

    debug!("Extracted {} byte blob", blob.len());
    Ok(Some(blob))
}
