//! # Common Components
//!
//! Shared utilities used by the library and the `stego` binary.
//!
//! ## Modules
//!
//! - [`error`]: the crate-wide [`StegoError`](error::StegoError)
//! - [`config`]: TOML configuration parsing
//! - [`logging`]: logger setup for binaries

pub mod config;
pub mod error;
pub mod logging;
