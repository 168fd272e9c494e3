//! Configuration types and CLI options.
//!
//! This module defines the scanner configuration value object and the enums
//! used for command-line argument parsing.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_POOL_IDLE_EXPIRY,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Scanner configuration.
///
/// Built once and handed to [`Scanner::new`](crate::Scanner::new); it cannot
/// be changed afterwards.
///
/// # Examples
///
/// ```no_run
/// use domain_security_scanner::ScannerConfig;
/// use std::time::Duration;
///
/// let config = ScannerConfig {
///     pool_size: 16,
///     cache_ttl: Duration::ZERO, // disable caching
///     scan_dnssec: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Maximum number of domains scanned concurrently
    pub pool_size: usize,

    /// How long an idle pool worker lingers before exiting
    pub pool_idle_expiry: Duration,

    /// Lifetime of cached results (zero disables the cache)
    pub cache_ttl: Duration,

    /// Timeout applied to every individual lookup
    pub lookup_timeout: Duration,

    /// Whether to query DNSKEY records
    pub scan_dnssec: bool,

    /// Upstream nameservers; empty uses the resolver defaults
    pub nameservers: Vec<IpAddr>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            pool_idle_expiry: DEFAULT_POOL_IDLE_EXPIRY,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            scan_dnssec: false,
            nameservers: Vec::new(),
        }
    }
}

impl ScannerConfig {
    /// Checks that every option holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.pool_idle_expiry.is_zero() {
            return Err(ConfigError::InvalidIdleExpiry);
        }
        Ok(())
    }

    /// Returns `true` if scan results are cached between calls.
    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}

/// Number of available processing units, falling back to 1.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes.
#[derive(Debug, Parser)]
#[command(
    name = "domain_security_scanner",
    about = "Scan domains for SPF, DKIM, DMARC, BIMI, MTA-STS and DNSSEC records"
)]
pub struct Opt {
    /// Domains to scan
    #[arg(value_parser)]
    pub domains: Vec<String>,

    /// File with one domain per line ('-' reads stdin)
    #[arg(long, short = 'f', value_parser)]
    pub file: Option<PathBuf>,

    /// Zone file to extract domains from
    #[arg(long, short = 'z', value_parser, conflicts_with = "file")]
    pub zone_file: Option<PathBuf>,

    /// Maximum domains scanned concurrently (defaults to the CPU count)
    #[arg(long, short = 'c')]
    pub concurrency: Option<usize>,

    /// Per-lookup timeout in seconds
    #[arg(long, short = 't', default_value_t = DEFAULT_LOOKUP_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Cache lifetime in seconds (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Also check for DNSSEC (DNSKEY records)
    #[arg(long)]
    pub dnssec: bool,

    /// Custom upstream nameserver (repeatable)
    #[arg(long = "nameserver", short = 'n')]
    pub nameservers: Vec<IpAddr>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the scanner configuration from the parsed options.
    pub fn scanner_config(&self) -> ScannerConfig {
        let lookup_timeout = Duration::from_secs(self.timeout);
        ScannerConfig {
            pool_size: self.concurrency.unwrap_or_else(default_pool_size),
            pool_idle_expiry: lookup_timeout,
            cache_ttl: Duration::from_secs(self.cache_ttl),
            lookup_timeout,
            scan_dnssec: self.dnssec,
            nameservers: self.nameservers.clone(),
        }
    }
}
