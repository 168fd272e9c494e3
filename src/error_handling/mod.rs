//! Error handling.
//!
//! This module provides the error types of the scanner:
//! - **Scan errors**: conditions that fail a whole `scan` call
//! - **Pool errors**: work rejected by the worker pool
//! - **Initialization errors**: logger, configuration and client setup
//!
//! Lookup failures for individual record kinds are not errors here. They are
//! recorded on the per-domain result and never fail the batch.

mod types;

// Re-export public API
pub use types::{ConfigError, InitializationError, PoolError, ScanError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_messages() {
        assert_eq!(ScanError::NoDomains.to_string(), "no domains to scan");
        assert_eq!(ScanError::EmptyDomain.to_string(), "empty domain");
        assert_eq!(ScanError::Closed.to_string(), "scanner closed");
    }

    #[test]
    fn test_pool_error_converts_into_scan_error() {
        let err: ScanError = PoolError::Closed.into();
        assert!(matches!(err, ScanError::Submit(PoolError::Closed)));
        assert_eq!(err.to_string(), "failed to submit scan task: pool is closed");
    }

    #[test]
    fn test_config_error_converts_into_initialization_error() {
        let err: InitializationError = ConfigError::InvalidTimeout.into();
        assert_eq!(
            err.to_string(),
            "Configuration error: timeout must be greater than 0"
        );
    }
}
