//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The scanner configuration was rejected.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Error initializing the HTTP client used for MTA-STS policies.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Invalid scanner configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The worker pool needs at least one worker.
    #[error("pool size must be greater than 0")]
    InvalidPoolSize,

    /// Lookups need a positive timeout.
    #[error("timeout must be greater than 0")]
    InvalidTimeout,

    /// Idle workers need a positive expiry.
    #[error("pool idle expiry must be greater than 0")]
    InvalidIdleExpiry,
}

/// Errors returned by the worker pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has been released and no longer accepts work.
    #[error("pool is closed")]
    Closed,
}

/// Errors that fail a whole scan call.
///
/// Per-domain problems (invalid domains, failed record lookups) are not
/// errors at this level; they are recorded on the individual
/// [`ScanResult`](crate::ScanResult).
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scanner was asked to scan nothing.
    #[error("no domains to scan")]
    NoDomains,

    /// One of the requested domains was an empty string.
    #[error("empty domain")]
    EmptyDomain,

    /// The scanner has been closed.
    #[error("scanner closed")]
    Closed,

    /// The worker pool refused a scan task.
    #[error("failed to submit scan task: {0}")]
    Submit(#[from] PoolError),

    /// The zone file could not be parsed.
    #[error("failed to parse zone file: {0}")]
    Zone(String),

    /// The zone file could not be read.
    #[error("failed to read zone file: {0}")]
    Io(#[from] std::io::Error),
}
