//! Logging utilities.
//!
//! Centralizes logger initialization. The engine logs through the standard
//! `log` facade; the binary picks the backend by calling `init_logging` early
//! in `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
