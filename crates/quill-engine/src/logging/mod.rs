//! Logging setup.
//!
//! The engine only speaks the `log` facade; this module wires `env_logger`
//! for binaries that do not bring their own backend.

mod init;

pub use init::{init_logging, LoggingConfig};
