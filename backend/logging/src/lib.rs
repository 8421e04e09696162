//! Logging setup for linecmd binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init_logger`]
//! once at startup.

pub mod logger;

pub use logger::{init_logger, LOG_FILE_PREFIX};
