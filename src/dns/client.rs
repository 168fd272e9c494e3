//! The DNS client contract used by the scanner.

use anyhow::Result;
use async_trait::async_trait;

/// An MTA-STS TXT record together with the policy it announces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MtaSts {
    /// The `_mta-sts` TXT record
    pub record: Option<String>,
    /// The policy file served from `mta-sts.<domain>`
    pub policy: Option<String>,
}

/// Record lookups the scanner needs, one method per record kind.
///
/// Implementations decide how lookups are performed and timed out. "Not
/// found" is an `Ok` with an empty value; an `Err` means the lookup itself
/// failed and will be reported against the record kind.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Nameservers delegated for `domain`.
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>>;

    /// Whether `domain` publishes any TXT record.
    async fn lookup_txt_exists(&self, domain: &str) -> Result<bool>;

    /// The BIMI record.
    async fn lookup_bimi(&self, domain: &str) -> Result<Option<String>>;

    /// The first DKIM key found under a known selector.
    async fn lookup_dkim(&self, domain: &str) -> Result<Option<String>>;

    /// The DMARC policy record.
    async fn lookup_dmarc(&self, domain: &str) -> Result<Option<String>>;

    /// The SPF record.
    async fn lookup_spf(&self, domain: &str) -> Result<Option<String>>;

    /// Mail exchangers, most preferred first.
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>>;

    /// The MTA-STS record and policy.
    async fn lookup_mta_sts(&self, domain: &str) -> Result<MtaSts>;

    /// Published DNSKEY records, if the zone is signed.
    async fn lookup_dnssec(&self, domain: &str) -> Result<Option<String>>;
}
