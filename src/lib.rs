//! domain_security_scanner library: concurrent email security DNS scanning
//!
//! This library scans domains concurrently and reports the DNS records that
//! make up their email security posture: NS, MX, SPF, DKIM, DMARC, BIMI,
//! MTA-STS (record and policy), and optionally DNSSEC.
//!
//! Scans run on a bounded worker pool, one task per domain. Each task fans
//! out into one lookup per record kind and merges partial failures into the
//! domain's result instead of failing the batch. Results are cached for a
//! configurable TTL.
//!
//! # Example
//!
//! ```no_run
//! use domain_security_scanner::{Scanner, ScannerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScannerConfig {
//!     pool_size: 32,
//!     scan_dnssec: true,
//!     ..Default::default()
//! };
//!
//! let scanner = Scanner::new(config)?;
//! let results = scanner.scan(&["example.com"]).await?;
//! println!("{}", serde_json::to_string_pretty(&results)?);
//! scanner.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod dns;
mod error_handling;
pub mod initialization;
pub mod pool;
mod scanner;

// Re-export public API
pub use cache::{CacheEntry, ScanCache};
pub use config::{LogFormat, LogLevel, Opt, ScannerConfig};
pub use dns::{DnsClient, HickoryDnsClient, MtaSts};
pub use error_handling::{ConfigError, InitializationError, PoolError, ScanError};
pub use pool::WorkerPool;
pub use scanner::{domains_from_zone, domains_from_zone_file, RecordKind, ScanResult, Scanner};
