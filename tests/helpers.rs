// Shared test helpers: an in-memory DNS client and scanner construction.
//
// The fake client answers from fixed data so scanner behavior can be checked
// without network access.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use domain_security_scanner::{DnsClient, MtaSts, RecordKind, Scanner, ScannerConfig};

/// A DNS client with configurable invalid, failing and panicking domains.
#[derive(Default)]
pub struct FakeDnsClient {
    invalid: HashSet<String>,
    failing: HashSet<RecordKind>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Not every test file uses every builder
impl FakeDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Domains with neither NS nor TXT records.
    pub fn with_invalid(mut self, domains: &[&str]) -> Self {
        self.invalid = domains.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Record kinds whose lookups fail with "timeout" for every domain.
    pub fn with_failing(mut self, kinds: &[RecordKind]) -> Self {
        self.failing = kinds.iter().copied().collect();
        self
    }

    /// Domains whose NS lookup panics.
    pub fn with_panicking(mut self, domains: &[&str]) -> Self {
        self.panicking = domains.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Makes the NS lookup sleep so concurrent tasks overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total number of lookup calls across all methods.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of NS lookups observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Domains whose validity check reached the client, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn answer(&self, kind: RecordKind, value: String) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&kind) {
            Err(anyhow!("timeout"))
        } else {
            Ok(Some(value))
        }
    }
}

#[async_trait]
impl DnsClient for FakeDnsClient {
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(domain.to_string());
        if self.panicking.contains(domain) {
            panic!("resolver exploded for {domain}");
        }

        if let Some(delay) = self.delay {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if self.invalid.contains(domain) {
            return Ok(Vec::new());
        }
        Ok(vec![format!("ns1.{domain}"), format!("ns2.{domain}")])
    }

    async fn lookup_txt_exists(&self, domain: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(!self.invalid.contains(domain))
    }

    async fn lookup_bimi(&self, domain: &str) -> Result<Option<String>> {
        self.answer(
            RecordKind::Bimi,
            format!("v=BIMI1; l=https://{domain}/logo.svg"),
        )
    }

    async fn lookup_dkim(&self, _domain: &str) -> Result<Option<String>> {
        self.answer(RecordKind::Dkim, "v=DKIM1; k=rsa; p=MIIB".to_string())
    }

    async fn lookup_dmarc(&self, domain: &str) -> Result<Option<String>> {
        self.answer(
            RecordKind::Dmarc,
            format!("v=DMARC1; p=reject; rua=mailto:dmarc@{domain}"),
        )
    }

    async fn lookup_spf(&self, _domain: &str) -> Result<Option<String>> {
        self.answer(RecordKind::Spf, "v=spf1 include:_spf.example.net -all".to_string())
    }

    async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&RecordKind::Mx) {
            return Err(anyhow!("timeout"));
        }
        Ok(vec![format!("mx1.{domain}"), format!("mx2.{domain}")])
    }

    async fn lookup_mta_sts(&self, _domain: &str) -> Result<MtaSts> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&RecordKind::MtaSts) {
            return Err(anyhow!("timeout"));
        }
        Ok(MtaSts {
            record: Some("v=STSv1; id=20240101".to_string()),
            policy: Some("version: STSv1\nmode: enforce\nmax_age: 86400\n".to_string()),
        })
    }

    async fn lookup_dnssec(&self, _domain: &str) -> Result<Option<String>> {
        self.answer(RecordKind::Dnssec, "257 3 13 mdsswUyr3DPW".to_string())
    }
}

/// Builds a scanner over `client` with caching on and DNSSEC off.
#[allow(dead_code)] // Used by other test files
pub fn test_scanner(client: Arc<FakeDnsClient>) -> Scanner {
    test_scanner_with(client, ScannerConfig::default())
}

/// Builds a scanner over `client` with a custom configuration.
pub fn test_scanner_with(client: Arc<FakeDnsClient>, config: ScannerConfig) -> Scanner {
    Scanner::with_client(config, client).expect("Failed to create test scanner")
}
