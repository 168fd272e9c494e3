//! Scan result types.

use std::collections::HashMap;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

use crate::config::{ERR_INVALID_DOMAIN, ERR_TASK_ABORTED};

/// Security-relevant DNS records of one domain.
///
/// Absent fields mean "not found or lookup failed"; lookup failures are
/// listed in `error` as `"<kind>: <message>"` joined with `"; "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// The domain name being scanned
    pub domain: String,

    /// Why the domain is invalid, or which lookups failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The BIMI record (`default._bimi.<domain>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bimi: Option<String>,

    /// The first DKIM key found under a known selector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dkim: Option<String>,

    /// The DMARC record (`_dmarc.<domain>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dmarc: Option<String>,

    /// Mail exchangers, most preferred first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mx: Vec<String>,

    /// Nameservers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ns: Vec<String>,

    /// The SPF record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spf: Option<String>,

    /// The MTA-STS record (`_mta-sts.<domain>`)
    #[serde(rename = "mta-sts", skip_serializing_if = "Option::is_none")]
    pub mta_sts: Option<String>,

    /// The MTA-STS policy file
    #[serde(rename = "mta-sts-policy", skip_serializing_if = "Option::is_none")]
    pub mta_sts_policy: Option<String>,

    /// DNSKEY records, one per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<String>,
}

impl ScanResult {
    /// An empty result for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        ScanResult {
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// A result for a domain with neither NS nor TXT records.
    pub fn invalid(domain: impl Into<String>) -> Self {
        ScanResult {
            error: Some(ERR_INVALID_DOMAIN.to_string()),
            ..Self::new(domain)
        }
    }

    /// A result for a domain whose scan task died before finishing.
    pub fn aborted(domain: impl Into<String>) -> Self {
        ScanResult {
            error: Some(ERR_TASK_ABORTED.to_string()),
            ..Self::new(domain)
        }
    }

    /// Returns `true` if the domain failed the validity check.
    pub fn is_invalid(&self) -> bool {
        self.error.as_deref() == Some(ERR_INVALID_DOMAIN)
    }

    /// Returns `true` if no record field is populated.
    pub fn has_no_records(&self) -> bool {
        self.ns.is_empty()
            && self.mx.is_empty()
            && self.bimi.is_none()
            && self.dkim.is_none()
            && self.dmarc.is_none()
            && self.spf.is_none()
            && self.mta_sts.is_none()
            && self.mta_sts_policy.is_none()
            && self.dnssec.is_none()
    }
}

/// The record kinds looked up concurrently for each valid domain.
///
/// Declaration order is the order failures are listed in a result's error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum RecordKind {
    /// BIMI brand indicator record
    Bimi,
    /// DKIM public key
    Dkim,
    /// DMARC policy
    Dmarc,
    /// Mail exchangers
    Mx,
    /// SPF policy
    Spf,
    /// MTA-STS record and policy
    MtaSts,
    /// DNSSEC keys
    Dnssec,
}

impl RecordKind {
    /// The label used as error prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Bimi => "bimi",
            RecordKind::Dkim => "dkim",
            RecordKind::Dmarc => "dmarc",
            RecordKind::Mx => "mx",
            RecordKind::Spf => "spf",
            RecordKind::MtaSts => "mta-sts",
            RecordKind::Dnssec => "dnssec",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind lookup failures of one domain, gathered at the join point.
#[derive(Debug, Default)]
pub(crate) struct LookupErrors(HashMap<RecordKind, String>);

impl LookupErrors {
    /// Unwraps a sub-lookup outcome, remembering the error if it failed.
    pub(crate) fn take<T: Default>(&mut self, kind: RecordKind, outcome: anyhow::Result<T>) -> T {
        match outcome {
            Ok(value) => value,
            Err(e) => {
                self.0.insert(kind, e.to_string());
                T::default()
            }
        }
    }

    /// All failures as `"<kind>: <message>"` joined with `"; "` in
    /// [`RecordKind`] order, or `None` if every lookup succeeded.
    pub(crate) fn joined(mut self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }

        let parts: Vec<String> = RecordKind::iter()
            .filter_map(|kind| self.0.remove(&kind).map(|msg| format!("{kind}: {msg}")))
            .collect();
        Some(parts.join("; "))
    }
}
