//! DNS resolver initialization.
//!
//! This module provides functions to initialize the DNS resolver with proper
//! timeout configuration.

use std::sync::Arc;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{ScannerConfig, DNS_ATTEMPTS, DNS_PORT};

/// Initializes the DNS resolver shared by all scan tasks.
///
/// Uses the configured nameservers if any were given, otherwise the default
/// resolver configuration (Google DNS: 8.8.8.8, 8.8.4.4). The per-query
/// timeout comes from `lookup_timeout` and retries are kept low so slow or
/// unresponsive servers fail fast.
///
/// # Returns
///
/// A configured `TokioAsyncResolver` wrapped in `Arc` for sharing across tasks.
pub fn init_resolver(config: &ScannerConfig) -> Arc<TokioAsyncResolver> {
    let opts = resolver_opts(config);

    let resolver_config = if config.nameservers.is_empty() {
        ResolverConfig::default()
    } else {
        ResolverConfig::from_parts(
            None,
            Vec::new(),
            NameServerConfigGroup::from_ips_clear(&config.nameservers, DNS_PORT, true),
        )
    };

    Arc::new(TokioAsyncResolver::tokio(resolver_config, opts))
}

fn resolver_opts(config: &ScannerConfig) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = config.lookup_timeout;
    opts.attempts = DNS_ATTEMPTS;
    // Names are always absolute; never append search domains
    opts.ndots = 0;
    // 4096-byte EDNS0 buffer so large TXT answers fit in UDP
    opts.edns0 = true;
    opts
}
