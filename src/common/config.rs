//! # Configuration
//!
//! TOML-backed settings shared by the library pipeline and the `stego` binary.
//! Every section is optional; missing values fall back to [`Default`].
//!
//! ```toml
//! [crypto]
//! kdf_iterations = 100000
//!
//! [policy]
//! max_plaintext_bytes = 256
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::error::{Result, StegoError};

/// Lowest PBKDF2 iteration count the library accepts.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Plaintext ceiling enforced by the embedding front-end.
pub const DEFAULT_MAX_PLAINTEXT_BYTES: usize = 256;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Errors
/// - [`StegoError::Io`] if the file cannot be read
/// - [`StegoError::Config`] if the content is not valid TOML for `T`
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/stego.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path.as_ref())?;
    let config: T = toml::from_str(&content).map_err(|e| StegoError::Config(e.to_string()))?;
    Ok(config)
}

/// Top-level configuration for embedding and extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub crypto: CryptoConfig,
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
}

/// Key-derivation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// PBKDF2-HMAC-SHA256 rounds for passphrase keys. Both sides must agree.
    pub kdf_iterations: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: MIN_KDF_ITERATIONS,
        }
    }
}

/// Product-level payload policy, separate from what the codec can physically carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub max_plaintext_bytes: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_plaintext_bytes: DEFAULT_MAX_PLAINTEXT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl StegoConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: StegoConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would weaken key derivation or make embedding impossible.
    pub fn validate(&self) -> Result<()> {
        if self.crypto.kdf_iterations < MIN_KDF_ITERATIONS {
            return Err(StegoError::Config(format!(
                "kdf_iterations must be at least {}, got {}",
                MIN_KDF_ITERATIONS, self.crypto.kdf_iterations
            )));
        }
        if self.policy.max_plaintext_bytes == 0 {
            return Err(StegoError::Config(
                "max_plaintext_bytes must be greater than zero".to_string(),
            ));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(StegoError::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}
