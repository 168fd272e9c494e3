//! DNS record extraction utilities.
//!
//! Security records share the TXT record type with everything else a domain
//! publishes, so each one is identified by its version tag.

/// Returns the first TXT record starting with `version`, trimmed.
///
/// Tags are matched case-insensitively: `v=spf1` and `v=SPF1` are both seen
/// in the wild.
pub fn extract_versioned_record(txt_records: &[String], version: &str) -> Option<String> {
    txt_records
        .iter()
        .map(|txt| txt.trim())
        .find(|txt| {
            txt.get(..version.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(version))
        })
        .map(str::to_string)
}

/// Builds the name a record lives under, e.g. `_dmarc.example.com`.
pub fn record_name(prefix: &str, domain: &str) -> String {
    format!("{prefix}.{domain}")
}

/// Builds the DKIM key location for a selector.
pub fn dkim_record_name(selector: &str, domain: &str) -> String {
    format!("{selector}._domainkey.{domain}")
}

/// Builds the HTTPS URL of a domain's MTA-STS policy.
pub fn mta_sts_policy_url(domain: &str) -> String {
    format!(
        "https://mta-sts.{domain}{}",
        crate::config::MTA_STS_POLICY_PATH
    )
}
