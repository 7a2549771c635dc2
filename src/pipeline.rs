//! # Embed / Extract Pipeline
//!
//! Chains the two independent layers:
//!
//! ```text
//! embed:   plaintext --seal--> blob --write--> stego pixels
//! extract: stego pixels --read--> blob --open--> plaintext
//! ```
//!
//! The codec never sees keys and the cipher never sees pixels.

use log::info;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::common::config::StegoConfig;
use crate::common::error::{Result, StegoError};
use crate::crypto::aead::{self, KeyMaterial, SecretKey};
use crate::processing::pixels::PixelBuffer;
use crate::processing::steganography;

/// Result of [`embed`].
#[derive(Debug)]
pub struct Embedded {
    pub image: PixelBuffer,
    /// Set when the caller asked for [`KeyMaterial::Generate`]; must be surfaced to the user.
    pub generated_key: Option<SecretKey>,
}

/// How much a given image can carry under a given key kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    pub width: u32,
    pub height: u32,
    pub channel_bytes: usize,
    pub header_bits: usize,
    pub max_blob_bytes: usize,
    /// Physical limit after encryption overhead.
    pub max_plaintext_bytes: usize,
    /// Product ceiling from [`crate::common::config::PolicyConfig`].
    pub policy_limit_bytes: usize,
}

impl CapacityReport {
    /// The tighter of the physical and policy limits.
    pub fn usable_plaintext_bytes(&self) -> usize {
        self.max_plaintext_bytes.min(self.policy_limit_bytes)
    }
}

/// `{ success, data?, error? }` result shape for machine-readable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StegoResult {
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failed(error: &StegoError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(user_message(error)),
        }
    }
}

/// Human-readable message telling the user which step to retry.
pub fn user_message(error: &StegoError) -> String {
    if error.is_no_data() {
        "No hidden data found in this image".to_string()
    } else if matches!(error, StegoError::AuthenticationFailure) {
        "Decryption failed: wrong key or corrupted data".to_string()
    } else {
        error.to_string()
    }
}

/// Encrypt `plaintext` and hide it in a copy of `image`.
///
/// # Errors
/// - [`StegoError::InvalidInput`] for an empty image or a plaintext above the policy ceiling
/// - [`StegoError::CapacityExceeded`] if the sealed blob does not fit
pub fn embed<R: RngCore + CryptoRng>(
    image: &PixelBuffer,
    plaintext: &[u8],
    key: &KeyMaterial,
    config: &StegoConfig,
    rng: &mut R,
) -> Result<Embedded> {
    if image.is_empty() {
        return Err(StegoError::InvalidInput("no image provided".to_string()));
    }
    let limit = config.policy.max_plaintext_bytes;
    if plaintext.len() > limit {
        return Err(StegoError::InvalidInput(format!(
            "payload is {} bytes, limit is {}",
            plaintext.len(),
            limit
        )));
    }

    // Fail before spending time on key derivation.
    let required = steganography::required_bits(aead::sealed_len(plaintext.len(), key));
    let available = steganography::capacity_bits(image);
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required_bits: required,
            available_bits: available,
        });
    }

    let sealed = aead::seal(plaintext, key, config.crypto.kdf_iterations, rng)?;
    let stego = steganography::write(image, &sealed.blob)?;

    info!(
        "Embedded {} byte payload ({} byte blob, {}) into {}x{} image",
        plaintext.len(),
        sealed.blob.len(),
        key.kind(),
        image.width(),
        image.height()
    );

    Ok(Embedded {
        image: stego,
        generated_key: sealed.generated_key,
    })
}

/// Recover and decrypt the payload hidden in `image`.
///
/// # Errors
/// - [`StegoError::NoEmbeddedData`] / [`StegoError::CorruptHeader`] if nothing plausible is hidden
/// - [`StegoError::AuthenticationFailure`] if a blob was found but does not open under `key`
pub fn extract(image: &PixelBuffer, key: &KeyMaterial, config: &StegoConfig) -> Result<Vec<u8>> {
    let blob = steganography::read(image)?.ok_or(StegoError::NoEmbeddedData)?;
    let plaintext = aead::open(&blob, key, config.crypto.kdf_iterations)?;

    info!(
        "Extracted {} byte payload from {}x{} image",
        plaintext.len(),
        image.width(),
        image.height()
    );
    Ok(plaintext)
}

/// Report how much plaintext `image` can carry when sealed with `key`.
pub fn inspect_capacity(
    image: &PixelBuffer,
    key: &KeyMaterial,
    config: &StegoConfig,
) -> CapacityReport {
    let max_blob_bytes = steganography::max_blob_len(image);
    CapacityReport {
        width: image.width(),
        height: image.height(),
        channel_bytes: image.len(),
        header_bits: steganography::HEADER_BITS,
        max_blob_bytes,
        max_plaintext_bytes: max_blob_bytes.saturating_sub(aead::overhead(key)),
        policy_limit_bytes: config.policy.max_plaintext_bytes,
    }
}
