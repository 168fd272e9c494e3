//! DNS resolution and record querying.
//!
//! This module provides the [`DnsClient`] contract the scanner depends on and
//! its production implementation using `hickory-resolver`:
//! - Nameserver queries (NS records)
//! - Text record queries (TXT records) with SPF/DMARC/BIMI/DKIM/MTA-STS extraction
//! - Mail exchanger queries (MX records)
//! - DNSSEC key queries (DNSKEY records)
//!
//! All operations are async and respect the configured timeout.

mod client;
mod extract;
mod hickory;
mod records;

// Re-export public API
pub use client::{DnsClient, MtaSts};
pub use extract::{dkim_record_name, extract_versioned_record, mta_sts_policy_url, record_name};
pub use hickory::HickoryDnsClient;
pub use records::{
    lookup_dnskey_records, lookup_mx_records, lookup_ns_records, lookup_txt_records,
};
