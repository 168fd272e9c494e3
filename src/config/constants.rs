//! Configuration constants.
//!
//! This module defines the defaults and fixed values used by the scanner,
//! including timeouts, cache lifetimes, and the DNS names queried for each
//! record kind.

use std::time::Duration;

/// Per-lookup timeout in seconds (DNS queries and the MTA-STS policy fetch).
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Cache time-to-live in seconds.
/// A value of 0 disables the cache entirely.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 180;

/// How long an idle pool worker waits for a job before exiting.
pub const DEFAULT_POOL_IDLE_EXPIRY: Duration = Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS);

/// Number of sub-lookups fanned out per domain (BIMI, DKIM, DMARC, MX, SPF,
/// MTA-STS, DNSSEC). The effective in-flight lookup ceiling is
/// `pool_size * FAN_OUT_WIDTH`.
pub const FAN_OUT_WIDTH: usize = 7;

/// Resolver attempts per query. Kept low so slow servers fail fast.
pub const DNS_ATTEMPTS: usize = 2;

/// Port used for custom upstream nameservers.
pub const DNS_PORT: u16 = 53;

/// Error recorded for domains that have neither NS nor TXT records.
pub const ERR_INVALID_DOMAIN: &str = "invalid domain";

/// Error recorded when a scan task panics or is dropped before reporting.
pub const ERR_TASK_ABORTED: &str = "scan task aborted";

// Record locations and version tags
/// Label prepended to the domain for the BIMI record
pub const BIMI_PREFIX: &str = "default._bimi";
/// Version tag of BIMI records
pub const BIMI_VERSION: &str = "v=BIMI1";
/// Version tag of DKIM key records
pub const DKIM_VERSION: &str = "v=DKIM1";
/// Label prepended to the domain for the DMARC record
pub const DMARC_PREFIX: &str = "_dmarc";
/// Version tag of DMARC records
pub const DMARC_VERSION: &str = "v=DMARC1";
/// Version tag of SPF records (queried at the domain itself)
pub const SPF_VERSION: &str = "v=spf1";
/// Label prepended to the domain for the MTA-STS record
pub const MTA_STS_PREFIX: &str = "_mta-sts";
/// Version tag of MTA-STS records
pub const MTA_STS_VERSION: &str = "v=STSv1";

/// Well-known path of the MTA-STS policy, served from `mta-sts.<domain>`.
pub const MTA_STS_POLICY_PATH: &str = "/.well-known/mta-sts.txt";

/// DKIM selectors probed under `<selector>._domainkey.<domain>`.
///
/// DKIM keys cannot be enumerated, so we try the selectors used by the
/// common mail providers. The first selector (in this order) with a
/// `v=DKIM1` record wins.
pub const DKIM_SELECTORS: &[&str] = &[
    "default",
    "dkim",
    "google",
    "k1",
    "k2",
    "mail",
    "mandrill",
    "mxvault",
    "s1",
    "s2",
    "selector1",
    "selector2",
    "smtp",
];
