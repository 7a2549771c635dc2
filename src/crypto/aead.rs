//! # Payload Encryption
//!
//! Seals a short plaintext into a self-contained blob with AES-256-GCM and
//! opens it again. The blob is opaque to the bit-plane codec.
//!
//! ## Blob layout
//!
//! ```text
//! raw key:     [nonce 12][ciphertext N][tag 16]
//! passphrase:  [salt 16][nonce 12][ciphertext N][tag 16]
//! ```
//!
//! The salt is random per seal call and feeds PBKDF2-HMAC-SHA256, so the same
//! passphrase never yields the same key twice. Which layout to parse is
//! decided by the [`KeyMaterial`] the caller opens with.
//!
//! ## Transport
//!
//! [`Sealed::to_text`] and [`open_text`] wrap the blob in standard base64 for
//! crossing text-only boundaries. A transport decode failure is reported as
//! [`StegoError::AuthenticationFailure`], same as a bad tag.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose, Engine as _};
use log::{debug, warn};
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

use crate::common::error::{Result, StegoError};
use crate::crypto::kdf::{derive_key, KEY_LEN, SALT_LEN};

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// A 256-bit symmetric key, wiped from memory on drop.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<[u8; KEY_LEN]>);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Draw a fresh key from a cryptographically secure RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        rng.fill_bytes(&mut *key);
        Self(key)
    }

    /// Parse a base64-encoded 32-byte key.
    pub fn from_base64(text: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            general_purpose::STANDARD
                .decode(text.trim())
                .map_err(|e| StegoError::InvalidInput(format!("key is not valid base64: {}", e)))?,
        );
        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            StegoError::InvalidInput(format!(
                "key must be {} bytes, got {}",
                KEY_LEN,
                decoded.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&*self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// What the caller hands over to protect (or unlock) a payload.
#[derive(Clone)]
pub enum KeyMaterial {
    /// A caller-managed 256-bit key.
    Raw(SecretKey),
    /// A passphrase stretched with PBKDF2 and a random per-blob salt.
    Passphrase(String),
    /// Seal only: create a random key and hand it back in [`Sealed::generated_key`].
    Generate,
}

impl KeyMaterial {
    /// Bytes that precede the nonce in a blob sealed with this key kind.
    fn prefix_len(&self) -> usize {
        match self {
            Self::Passphrase(_) => SALT_LEN,
            Self::Raw(_) | Self::Generate => 0,
        }
    }

    /// Short label safe for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw-key",
            Self::Passphrase(_) => "passphrase",
            Self::Generate => "generated-key",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial::{}", self.kind())
    }
}

/// Output of [`seal`].
#[derive(Debug)]
pub struct Sealed {
    pub blob: Vec<u8>,
    /// Present only for [`KeyMaterial::Generate`]. Without it the blob cannot be opened.
    pub generated_key: Option<SecretKey>,
}

impl Sealed {
    /// Base64 transport encoding of the blob.
    pub fn to_text(&self) -> String {
        general_purpose::STANDARD.encode(&self.blob)
    }
}

/// Total blob length for a plaintext of `plaintext_len` bytes under `key`.
pub fn sealed_len(plaintext_len: usize, key: &KeyMaterial) -> usize {
    key.prefix_len() + NONCE_LEN + plaintext_len + TAG_LEN
}

/// Fixed per-blob overhead for `key`.
pub fn overhead(key: &KeyMaterial) -> usize {
    sealed_len(0, key)
}

/// Encrypt `plaintext` into a self-contained blob.
///
/// A fresh nonce is drawn from `rng` on every call, so sealing the same
/// plaintext twice under the same key gives different blobs.
pub fn seal<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    key: &KeyMaterial,
    kdf_iterations: u32,
    rng: &mut R,
) -> Result<Sealed> {
    let mut blob = Vec::with_capacity(sealed_len(plaintext.len(), key));

    let (cipher_key, generated_key) = match key {
        KeyMaterial::Raw(secret) => (Zeroizing::new(*secret.as_bytes()), None),
        KeyMaterial::Passphrase(passphrase) => {
            let mut salt = [0u8; SALT_LEN];
            rng.fill_bytes(&mut salt);
            blob.extend_from_slice(&salt);
            (derive_key(passphrase, &salt, kdf_iterations)?, None)
        }
        KeyMaterial::Generate => {
            let secret = SecretKey::generate(rng);
            warn!("Sealing with a generated key; the payload is unrecoverable unless that key is stored");
            (Zeroizing::new(*secret.as_bytes()), Some(secret))
        }
    };

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(&*cipher_key)
        .map_err(|_| StegoError::InvalidInput("invalid AES-256 key length".to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| StegoError::InvalidInput("plaintext too large to encrypt".to_string()))?;

    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    debug!(
        "Sealed {} plaintext bytes into {} byte blob ({})",
        plaintext.len(),
        blob.len(),
        key.kind()
    );

    Ok(Sealed {
        blob,
        generated_key,
    })
}

/// Decrypt and authenticate a blob produced by [`seal`].
///
/// Any mismatch (wrong key, flipped bit, truncated blob) yields
/// [`StegoError::AuthenticationFailure`] and no plaintext.
pub fn open(blob: &[u8], key: &KeyMaterial, kdf_iterations: u32) -> Result<Vec<u8>> {
    if matches!(key, KeyMaterial::Generate) {
        return Err(StegoError::InvalidInput(
            "a payload cannot be opened without the key it was sealed with".to_string(),
        ));
    }

    if blob.len() < overhead(key) {
        debug!(
            "Blob of {} bytes is shorter than the {} byte minimum",
            blob.len(),
            overhead(key)
        );
        return Err(StegoError::AuthenticationFailure);
    }

    let (salt, rest) = blob.split_at(key.prefix_len());
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let cipher_key = match key {
        KeyMaterial::Raw(secret) => Zeroizing::new(*secret.as_bytes()),
        KeyMaterial::Passphrase(passphrase) => derive_key(passphrase, salt, kdf_iterations)?,
        KeyMaterial::Generate => {
            return Err(StegoError::InvalidInput("no key to open with".to_string()))
        }
    };

    let cipher = Aes256Gcm::new_from_slice(&*cipher_key)
        .map_err(|_| StegoError::InvalidInput("invalid AES-256 key length".to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::AuthenticationFailure)
}

/// [`open`] a base64 transport string.
pub fn open_text(text: &str, key: &KeyMaterial, kdf_iterations: u32) -> Result<Vec<u8>> {
    let blob = general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|_| StegoError::AuthenticationFailure)?;
    open(&blob, key, kdf_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::MIN_KDF_ITERATIONS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn raw_key(byte: u8) -> KeyMaterial {
        KeyMaterial::Raw(SecretKey::from_bytes([byte; KEY_LEN]))
    }

    #[test]
    fn raw_key_roundtrip() {
        let mut rng = StdRng::seed_from_u64(1);
        let key = raw_key(9);
        let sealed = seal(b"hello", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        assert_eq!(sealed.blob.len(), NONCE_LEN + 5 + TAG_LEN);
        assert!(sealed.generated_key.is_none());
        let pt = open(&sealed.blob, &key, MIN_KDF_ITERATIONS).unwrap();
        assert_eq!(pt, b"hello");
    }

    #[test]
    fn passphrase_roundtrip_and_wrong_passphrase() {
        let mut rng = StdRng::seed_from_u64(2);
        let key = KeyMaterial::Passphrase("correct-horse".to_string());
        let sealed = seal(b"hello", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        assert_eq!(sealed.blob.len(), SALT_LEN + NONCE_LEN + 5 + TAG_LEN);
        assert_eq!(open(&sealed.blob, &key, MIN_KDF_ITERATIONS).unwrap(), b"hello");

        let wrong = KeyMaterial::Passphrase("wrong-horse".to_string());
        assert!(matches!(
            open(&sealed.blob, &wrong, MIN_KDF_ITERATIONS),
            Err(StegoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn generated_key_is_returned_and_opens() {
        let mut rng = StdRng::seed_from_u64(3);
        let sealed = seal(b"secret", &KeyMaterial::Generate, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        let key = sealed.generated_key.clone().expect("generated key must be returned");
        let pt = open(&sealed.blob, &KeyMaterial::Raw(key), MIN_KDF_ITERATIONS).unwrap();
        assert_eq!(pt, b"secret");
    }

    #[test]
    fn open_with_generate_is_invalid_input() {
        let mut rng = StdRng::seed_from_u64(4);
        let sealed = seal(b"x", &raw_key(1), MIN_KDF_ITERATIONS, &mut rng).unwrap();
        assert!(matches!(
            open(&sealed.blob, &KeyMaterial::Generate, MIN_KDF_ITERATIONS),
            Err(StegoError::InvalidInput(_))
        ));
    }

    #[test]
    fn short_blob_fails_authentication() {
        let key = raw_key(1);
        let blob = vec![0u8; NONCE_LEN + TAG_LEN - 1];
        assert!(matches!(
            open(&blob, &key, MIN_KDF_ITERATIONS),
            Err(StegoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn every_bit_flip_is_detected() {
        let mut rng = StdRng::seed_from_u64(5);
        let key = raw_key(7);
        let sealed = seal(b"tamper", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();

        for bit in 0..sealed.blob.len() * 8 {
            let mut tampered = sealed.blob.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            assert!(
                matches!(
                    open(&tampered, &key, MIN_KDF_ITERATIONS),
                    Err(StegoError::AuthenticationFailure)
                ),
                "flip of bit {} went undetected",
                bit
            );
        }
    }

    #[test]
    fn nonce_differs_per_seal() {
        let mut rng = StdRng::seed_from_u64(6);
        let key = raw_key(3);
        let a = seal(b"same", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        let b = seal(b"same", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        assert_ne!(a.blob[..NONCE_LEN], b.blob[..NONCE_LEN]);
        assert_ne!(a.blob, b.blob);
    }

    #[test]
    fn text_transport_roundtrip_and_garbage() {
        let mut rng = StdRng::seed_from_u64(7);
        let key = raw_key(5);
        let sealed = seal(b"over the wire", &key, MIN_KDF_ITERATIONS, &mut rng).unwrap();
        let text = sealed.to_text();
        assert_eq!(open_text(&text, &key, MIN_KDF_ITERATIONS).unwrap(), b"over the wire");
        assert!(matches!(
            open_text("not base64 at all!", &key, MIN_KDF_ITERATIONS),
            Err(StegoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn secret_key_base64_and_redaction() {
        let key = SecretKey::from_bytes([42u8; KEY_LEN]);
        let parsed = SecretKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
        assert_eq!(format!("{:?}", key), "SecretKey(<redacted>)");
        assert!(SecretKey::from_base64("AAAA").is_err());
    }

    #[test]
    fn sealed_len_matches_layout() {
        assert_eq!(overhead(&raw_key(0)), 28);
        assert_eq!(overhead(&KeyMaterial::Passphrase(String::new())), 44);
        assert_eq!(sealed_len(5, &KeyMaterial::Generate), 33);
    }
}
