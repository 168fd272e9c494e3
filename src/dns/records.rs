//! DNS record queries (NS, TXT, MX, DNSKEY).
//!
//! Every function treats "no records found" (including NXDOMAIN) as an empty
//! answer. Real failures such as timeouts or refused queries are returned as
//! errors so they can be recorded as partial failures.

use anyhow::{Error, Result};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

/// Queries NS (nameserver) records for a domain.
///
/// # Returns
///
/// Nameserver hostnames without the trailing root dot.
pub async fn lookup_ns_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    match resolver.lookup(domain, RecordType::NS).await {
        Ok(lookup) => Ok(lookup
            .iter()
            .filter_map(|rdata| {
                if let RData::NS(ns) = rdata {
                    Some(strip_root(&ns.to_utf8()))
                } else {
                    None
                }
            })
            .collect()),
        Err(e) => empty_or_error(domain, "NS", e),
    }
}

/// Queries TXT (text) records for a domain.
///
/// TXT records can be split into several character strings; they are joined
/// back into one string per record.
pub async fn lookup_txt_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    match resolver.lookup(domain, RecordType::TXT).await {
        Ok(lookup) => Ok(lookup
            .iter()
            .filter_map(|rdata| {
                if let RData::TXT(txt) = rdata {
                    Some(
                        txt.iter()
                            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                            .collect::<Vec<String>>()
                            .join(""),
                    )
                } else {
                    None
                }
            })
            .collect()),
        Err(e) => empty_or_error(domain, "TXT", e),
    }
}

/// Queries MX (mail exchanger) records for a domain.
///
/// # Returns
///
/// Exchange hostnames ordered by preference (lowest first).
pub async fn lookup_mx_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    match resolver.lookup(domain, RecordType::MX).await {
        Ok(lookup) => {
            let mut mx_records: Vec<(u16, String)> = lookup
                .iter()
                .filter_map(|rdata| {
                    if let RData::MX(mx) = rdata {
                        Some((mx.preference(), strip_root(&mx.exchange().to_utf8())))
                    } else {
                        None
                    }
                })
                .collect();
            mx_records.sort_by_key(|(priority, _)| *priority);
            Ok(mx_records.into_iter().map(|(_, host)| host).collect())
        }
        Err(e) => empty_or_error(domain, "MX", e),
    }
}

/// Queries DNSKEY records for a domain, rendered in presentation format.
pub async fn lookup_dnskey_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    match resolver.lookup(domain, RecordType::DNSKEY).await {
        Ok(lookup) => Ok(lookup.iter().map(|rdata| rdata.to_string()).collect()),
        Err(e) => empty_or_error(domain, "DNSKEY", e),
    }
}

fn empty_or_error<T>(domain: &str, record_type: &str, e: ResolveError) -> Result<Vec<T>, Error> {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
        ResolveErrorKind::Timeout => {
            log::warn!("{record_type} record lookup timed out for {domain}: {e}");
            Err(e.into())
        }
        _ => {
            log::warn!("Failed to lookup {record_type} records for {domain}: {e}");
            Err(e.into())
        }
    }
}

/// Removes the trailing root label dot from a fully-qualified name.
pub(crate) fn strip_root(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
