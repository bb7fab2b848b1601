//! # Common Components
//!
//! Shared utilities used by the library and the `stego` binary.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration loading
//! - [`error`]: The [`StegoError`](error::StegoError) taxonomy
//! - [`logging`]: Logger initialisation

pub mod config;
pub mod error;
pub mod logging;
