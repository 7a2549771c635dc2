//! Passphrase key derivation: PBKDF2-HMAC-SHA256 with a per-seal random salt.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::common::config::MIN_KDF_ITERATIONS;
use crate::common::error::{Result, StegoError};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// Salt length in bytes, stored in front of passphrase-sealed blobs.
pub const SALT_LEN: usize = 16;

/// Derive a 32-byte key from a passphrase and salt.
///
/// Deterministic for a given (passphrase, salt, iterations) triple so the
/// opening side reproduces the sealing key from the salt carried in the blob.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if iterations < MIN_KDF_ITERATIONS {
        return Err(StegoError::InvalidInput(format!(
            "PBKDF2 iteration count {} is below the minimum of {}",
            iterations, MIN_KDF_ITERATIONS
        )));
    }
    if salt.len() != SALT_LEN {
        return Err(StegoError::InvalidInput(format!(
            "salt must be {} bytes, got {}",
            SALT_LEN,
            salt.len()
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut *key);
    Ok(key)
}
