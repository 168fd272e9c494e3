//! `DnsClient` backed by `hickory-resolver`.

use std::sync::Arc;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use futures::future::join_all;
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};

use crate::config::{
    ScannerConfig, BIMI_PREFIX, BIMI_VERSION, DKIM_SELECTORS, DKIM_VERSION, DMARC_PREFIX,
    DMARC_VERSION, MTA_STS_PREFIX, MTA_STS_VERSION, SPF_VERSION,
};
use crate::error_handling::InitializationError;
use crate::initialization::{init_client, init_resolver};

use super::client::{DnsClient, MtaSts};
use super::extract::{dkim_record_name, extract_versioned_record, mta_sts_policy_url, record_name};
use super::records::{
    lookup_dnskey_records, lookup_mx_records, lookup_ns_records, lookup_txt_records,
};

/// Looks records up through a shared async resolver and fetches MTA-STS
/// policies over HTTPS.
#[derive(Clone)]
pub struct HickoryDnsClient {
    resolver: Arc<TokioAsyncResolver>,
    http: Arc<reqwest::Client>,
}

impl std::fmt::Debug for HickoryDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryDnsClient").finish_non_exhaustive()
    }
}

impl HickoryDnsClient {
    /// Wraps an existing resolver and HTTP client.
    pub fn new(resolver: Arc<TokioAsyncResolver>, http: Arc<reqwest::Client>) -> Self {
        HickoryDnsClient { resolver, http }
    }

    /// Builds the resolver and HTTP client from the scanner configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ScannerConfig) -> Result<Self, InitializationError> {
        Ok(Self::new(init_resolver(config), init_client(config)?))
    }

    /// Finds the record tagged `version` among the TXT records at `name`.
    async fn versioned_txt(&self, name: String, version: &str) -> Result<Option<String>> {
        let txt = lookup_txt_records(&name, &self.resolver).await?;
        Ok(extract_versioned_record(&txt, version))
    }

    async fn fetch_mta_sts_policy(&self, domain: &str) -> Result<String> {
        let url = mta_sts_policy_url(domain);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DnsClient for HickoryDnsClient {
    async fn lookup_ns(&self, domain: &str) -> Result<Vec<String>> {
        lookup_ns_records(domain, &self.resolver).await
    }

    async fn lookup_txt_exists(&self, domain: &str) -> Result<bool> {
        Ok(!lookup_txt_records(domain, &self.resolver).await?.is_empty())
    }

    async fn lookup_bimi(&self, domain: &str) -> Result<Option<String>> {
        self.versioned_txt(record_name(BIMI_PREFIX, domain), BIMI_VERSION)
            .await
    }

    async fn lookup_dkim(&self, domain: &str) -> Result<Option<String>> {
        let answers = join_all(
            DKIM_SELECTORS
                .iter()
                .map(|selector| self.versioned_txt(dkim_record_name(selector, domain), DKIM_VERSION)),
        )
        .await;

        // Selector order decides which key wins; failures only matter if no
        // selector produced a key.
        let mut first_error: Option<Error> = None;
        for answer in answers {
            match answer {
                Ok(Some(record)) => return Ok(Some(record)),
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    async fn lookup_dmarc(&self, domain: &str) -> Result<Option<String>> {
        self.versioned_txt(record_name(DMARC_PREFIX, domain), DMARC_VERSION)
            .await
    }

    async fn lookup_spf(&self, domain: &str) -> Result<Option<String>> {
        self.versioned_txt(domain.to_string(), SPF_VERSION).await
    }

    async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>> {
        lookup_mx_records(domain, &self.resolver).await
    }

    async fn lookup_mta_sts(&self, domain: &str) -> Result<MtaSts> {
        let record = self
            .versioned_txt(record_name(MTA_STS_PREFIX, domain), MTA_STS_VERSION)
            .await?;
        if record.is_none() {
            return Ok(MtaSts::default());
        }

        let policy = match self.fetch_mta_sts_policy(domain).await {
            Ok(policy) => {
                debug!("Fetched MTA-STS policy for {domain}");
                Some(policy)
            }
            Err(e) => {
                warn!("MTA-STS record found for {domain} but policy fetch failed: {e:#}");
                None
            }
        };
        Ok(MtaSts { record, policy })
    }

    async fn lookup_dnssec(&self, domain: &str) -> Result<Option<String>> {
        let keys = lookup_dnskey_records(domain, &self.resolver).await?;
        Ok((!keys.is_empty()).then(|| keys.join("\n")))
    }
}
