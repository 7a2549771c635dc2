//! # Payload Cryptography
//!
//! - [`kdf`]: PBKDF2-HMAC-SHA256 passphrase stretching
//! - [`aead`]: AES-256-GCM seal/open of the hidden payload

pub mod aead;
pub mod kdf;

pub use aead::{open, open_text, seal, sealed_len, KeyMaterial, SecretKey, Sealed};
