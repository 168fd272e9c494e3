//! HTTP client initialization.
//!
//! The HTTP client is only used to fetch MTA-STS policy files.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::ScannerConfig;

/// User-Agent sent with policy requests.
const USER_AGENT: &str = concat!("domain_security_scanner/", env!("CARGO_PKG_VERSION"));

/// Initializes the HTTP client used for MTA-STS policy fetches.
///
/// The request timeout matches the per-lookup DNS timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &ScannerConfig) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(config.lookup_timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
