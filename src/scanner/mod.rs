//! Concurrent scan orchestration.
//!
//! The [`Scanner`] owns a worker pool and a result cache. Each requested
//! domain becomes one pool task; each task fans out into seven concurrent
//! record lookups that run inside the task, outside the pool's admission
//! control. In-flight lookups can therefore reach
//! `pool_size * FAN_OUT_WIDTH`, but a small pool can never deadlock waiting
//! on its own sub-lookups.

mod result;
mod task;
mod zone;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;

use crate::cache::ScanCache;
use crate::config::{ScannerConfig, FAN_OUT_WIDTH};
use crate::dns::{DnsClient, HickoryDnsClient};
use crate::error_handling::{InitializationError, ScanError};
use crate::pool::WorkerPool;

pub use result::{RecordKind, ScanResult};
pub use zone::{domains_from_zone, domains_from_zone_file};

use task::{process_domain_task, ResultReporter, ScanContext};

/// Scans domains for their email security records.
///
/// # Example
///
/// ```no_run
/// use domain_security_scanner::{Scanner, ScannerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let scanner = Scanner::new(ScannerConfig::default())?;
/// let mut results = scanner.scan(&["example.com", "example.org"]).await?;
/// results.sort_by(|a, b| a.domain.cmp(&b.domain));
/// for result in &results {
///     println!("{}: {:?}", result.domain, result.spf);
/// }
/// scanner.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Scanner {
    config: ScannerConfig,
    ctx: Arc<ScanContext>,
    pool: WorkerPool,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Creates a scanner that resolves through `hickory-resolver`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ScannerConfig) -> Result<Self, InitializationError> {
        config.validate()?;
        let client = HickoryDnsClient::from_config(&config)?;
        Self::with_client(config, Arc::new(client))
    }

    /// Creates a scanner that performs its lookups through `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_client(
        config: ScannerConfig,
        client: Arc<dyn DnsClient>,
    ) -> Result<Self, InitializationError> {
        config.validate()?;

        let ctx = Arc::new(ScanContext {
            client,
            cache: Arc::new(ScanCache::new(config.cache_ttl)),
            scan_dnssec: config.scan_dnssec,
        });
        let pool = WorkerPool::new(config.pool_size, config.pool_idle_expiry);
        debug!(
            "Scanner ready: {} worker(s), up to {} lookups in flight, cache {}, dnssec {}",
            pool.capacity(),
            pool.capacity() * FAN_OUT_WIDTH,
            if config.cache_enabled() {
                format!("ttl {:?}", config.cache_ttl)
            } else {
                "disabled".to_string()
            },
            config.scan_dnssec
        );

        Ok(Scanner { config, ctx, pool })
    }

    /// Scans `domains` and returns one result per domain.
    ///
    /// Results come back in completion order, not input order. Invalid
    /// domains and failed lookups are reported on the individual results.
    ///
    /// # Errors
    ///
    /// - `ScanError::Closed` if [`close`](Self::close) was called
    /// - `ScanError::EmptyDomain` if any domain is an empty string
    /// - `ScanError::NoDomains` if `domains` is empty
    /// - `ScanError::Submit` if the pool rejected a task
    ///
    /// None of these perform any lookup, except a `Submit` failure, where
    /// tasks submitted before the failure still run.
    pub async fn scan<S: AsRef<str>>(&self, domains: &[S]) -> Result<Vec<ScanResult>, ScanError> {
        if self.pool.is_closed() {
            return Err(ScanError::Closed);
        }
        if domains.iter().any(|domain| domain.as_ref().is_empty()) {
            return Err(ScanError::EmptyDomain);
        }
        if domains.is_empty() {
            return Err(ScanError::NoDomains);
        }

        let (sender, mut receiver) = mpsc::unbounded_channel();
        for domain in domains {
            let domain = domain.as_ref().to_string();
            let reporter = ResultReporter::new(domain.clone(), sender.clone());
            self.pool
                .submit(process_domain_task(Arc::clone(&self.ctx), domain, reporter))?;
        }
        drop(sender);

        // Every task holds a reporter; the channel closes once all are done
        let mut results = Vec::with_capacity(domains.len());
        while let Some(result) = receiver.recv().await {
            results.push(result);
        }

        debug!("Scanned {} domain(s)", results.len());
        Ok(results)
    }

    /// Extracts the domains of a zone file and scans them.
    ///
    /// See [`domains_from_zone`] for which records are considered.
    ///
    /// # Errors
    ///
    /// Returns the zone parsing errors of [`domains_from_zone`] and the
    /// errors of [`scan`](Self::scan).
    pub async fn scan_zone<R: Read>(&self, zone: R) -> Result<Vec<ScanResult>, ScanError> {
        if self.pool.is_closed() {
            return Err(ScanError::Closed);
        }

        let domains = domains_from_zone(zone)?;
        debug!("Found {} domain(s) in zone file", domains.len());
        self.scan(domains.as_slice()).await
    }

    /// Reads the zone file at `path` and scans its domains.
    ///
    /// Relative `$INCLUDE` paths resolve against the directory of `path`.
    ///
    /// # Errors
    ///
    /// See [`scan_zone`](Self::scan_zone).
    pub async fn scan_zone_file(&self, path: &Path) -> Result<Vec<ScanResult>, ScanError> {
        if self.pool.is_closed() {
            return Err(ScanError::Closed);
        }

        let domains = domains_from_zone_file(path)?;
        debug!(
            "Found {} domain(s) in zone file {}",
            domains.len(),
            path.display()
        );
        self.scan(domains.as_slice()).await
    }

    /// Shuts the pool down and empties the cache.
    ///
    /// Scans already in progress are left to finish, but their results are
    /// no longer cached. Closing an already closed scanner does nothing.
    pub async fn close(&self) {
        self.pool.release();
        self.ctx.cache.close().await;
        debug!("Scanner closed");
    }

    /// Returns `true` once the scanner has been closed.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// The configuration the scanner was built with.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}
