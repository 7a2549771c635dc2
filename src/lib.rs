//! # stego-vault
//!
//! Hide a short encrypted message in the pixel data of a PNG image and get it
//! back later.
//!
//! - [`crypto`]: AES-256-GCM sealing with raw, passphrase or generated keys
//! - [`processing`]: the LSB bit-plane codec and PNG adapter
//! - [`pipeline`]: `embed` / `extract` use cases chaining the two

pub mod common;
pub mod crypto;
pub mod pipeline;
pub mod processing;

pub use common::config::StegoConfig;
pub use common::error::{Result, StegoError};
pub use crypto::{KeyMaterial, SecretKey};
pub use pipeline::{embed, extract, inspect_capacity, CapacityReport, Embedded, StegoResult};
pub use processing::PixelBuffer;
