//! Per-domain task processing.
//!
//! One task runs per requested domain: cache check, validity check, the
//! seven-way record fan-out, and the write-through to the cache.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::cache::ScanCache;
use crate::dns::DnsClient;

use super::result::{LookupErrors, RecordKind, ScanResult};

/// Everything a scan task needs, shared by all tasks of a scanner.
pub(crate) struct ScanContext {
    pub(crate) client: Arc<dyn DnsClient>,
    pub(crate) cache: Arc<ScanCache>,
    pub(crate) scan_dnssec: bool,
}

/// Delivers exactly one result per domain to the collecting `scan` call.
///
/// If the task panics or is dropped before reporting, the reporter sends an
/// "aborted" result on drop so the caller still gets one result per domain.
pub(crate) struct ResultReporter {
    domain: String,
    sender: mpsc::UnboundedSender<ScanResult>,
    reported: bool,
}

impl ResultReporter {
    pub(crate) fn new(domain: String, sender: mpsc::UnboundedSender<ScanResult>) -> Self {
        ResultReporter {
            domain,
            sender,
            reported: false,
        }
    }

    pub(crate) fn report(mut self, result: ScanResult) {
        self.reported = true;
        // The receiver only goes away if the scan call itself was dropped
        let _ = self.sender.send(result);
    }
}

impl Drop for ResultReporter {
    fn drop(&mut self) {
        if !self.reported {
            warn!("Scan task for {} ended without a result", self.domain);
            let _ = self.sender.send(ScanResult::aborted(self.domain.as_str()));
        }
    }
}

/// Process a single domain task.
///
/// A cache hit is reported as is, without any DNS I/O. On a miss the domain
/// is scanned and the outcome written through to the cache, invalid-domain
/// results included, so repeated bad input does not reach the resolver again
/// within the TTL.
pub(crate) async fn process_domain_task(
    ctx: Arc<ScanContext>,
    domain: String,
    reporter: ResultReporter,
) {
    if let Some(cached) = ctx.cache.get(&domain).await {
        debug!("Cache hit for {domain}");
        reporter.report(cached);
        return;
    }
    if ctx.cache.is_enabled() {
        debug!("Cache miss for {domain}");
    }

    let result = scan_domain(ctx.client.as_ref(), &domain, ctx.scan_dnssec).await;
    ctx.cache.set(&domain, result.clone()).await;
    reporter.report(result);
}

/// Scans one domain: validity check, then all record lookups concurrently.
///
/// Failed lookups leave their fields empty and are listed in `error`;
/// fields filled by successful lookups are kept.
pub(crate) async fn scan_domain(
    client: &dyn DnsClient,
    domain: &str,
    scan_dnssec: bool,
) -> ScanResult {
    let ns = match check_domain(client, domain).await {
        Some(ns) => ns,
        None => {
            debug!("{domain} has neither NS nor TXT records, marking invalid");
            return ScanResult::invalid(domain);
        }
    };

    // All seven branches complete before anything is merged
    let (bimi, dkim, dmarc, mx, spf, mta_sts, dnssec) = tokio::join!(
        client.lookup_bimi(domain),
        client.lookup_dkim(domain),
        client.lookup_dmarc(domain),
        client.lookup_mx(domain),
        client.lookup_spf(domain),
        client.lookup_mta_sts(domain),
        async {
            if scan_dnssec {
                client.lookup_dnssec(domain).await
            } else {
                Ok(None)
            }
        },
    );

    let mut errors = LookupErrors::default();
    let bimi = errors.take(RecordKind::Bimi, bimi);
    let dkim = errors.take(RecordKind::Dkim, dkim);
    let dmarc = errors.take(RecordKind::Dmarc, dmarc);
    let mx = errors.take(RecordKind::Mx, mx);
    let spf = errors.take(RecordKind::Spf, spf);
    let mta_sts = errors.take(RecordKind::MtaSts, mta_sts);
    let dnssec = errors.take(RecordKind::Dnssec, dnssec);

    ScanResult {
        domain: domain.to_string(),
        error: errors.joined(),
        bimi,
        dkim,
        dmarc,
        mx,
        ns,
        spf,
        mta_sts: mta_sts.record,
        mta_sts_policy: mta_sts.policy,
        dnssec,
    }
}

/// Checks that `domain` exists, returning its nameservers.
///
/// Subdomains usually have no NS delegation of their own but may still carry
/// TXT records, so a failed or empty NS answer falls back to a TXT probe.
/// Returns `None` if both checks fail.
async fn check_domain(client: &dyn DnsClient, domain: &str) -> Option<Vec<String>> {
    match client.lookup_ns(domain).await {
        Ok(ns) if !ns.is_empty() => return Some(ns),
        Ok(_) => debug!("No NS records for {domain}, probing TXT"),
        Err(e) => debug!("NS lookup failed for {domain} ({e}), probing TXT"),
    }

    match client.lookup_txt_exists(domain).await {
        Ok(true) => Some(Vec::new()),
        Ok(false) => None,
        Err(e) => {
            debug!("TXT probe failed for {domain}: {e}");
            None
        }
    }
}
