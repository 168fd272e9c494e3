//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, record locations, etc.)
//! - The scanner configuration value object
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{default_pool_size, LogFormat, LogLevel, Opt, ScannerConfig};
