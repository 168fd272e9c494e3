//! End-to-end scanner behavior over an in-memory DNS client.
//!
//! These tests drive the public `Scanner` API: result cardinality, caching,
//! invalid domains, partial lookup failures, rejection of bad input, and the
//! close lifecycle.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use domain_security_scanner::{RecordKind, ScanError, ScannerConfig};

use helpers::{test_scanner, test_scanner_with, FakeDnsClient};

#[tokio::test]
async fn test_scan_returns_one_result_per_domain() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));

    let domains: Vec<String> = (0..25).map(|i| format!("domain{i}.example")).collect();
    let results = scanner.scan(domains.as_slice()).await.unwrap();

    assert_eq!(results.len(), domains.len());
    let returned: HashSet<&str> = results.iter().map(|r| r.domain.as_str()).collect();
    let requested: HashSet<&str> = domains.iter().map(String::as_str).collect();
    assert_eq!(returned, requested);
    assert!(results.iter().all(|r| r.error.is_none()));

    scanner.close().await;
}

#[tokio::test]
async fn test_scan_keeps_duplicate_domains() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner_with(
        Arc::clone(&client),
        ScannerConfig {
            cache_ttl: Duration::ZERO,
            ..Default::default()
        },
    );

    let results = scanner
        .scan(&["example.com", "example.com", "example.org"])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().filter(|r| r.domain == "example.com").count(),
        2
    );
}

#[tokio::test]
async fn test_valid_domain_has_all_records() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner_with(
        Arc::clone(&client),
        ScannerConfig {
            scan_dnssec: true,
            ..Default::default()
        },
    );

    let results = scanner.scan(&["example.com"]).await.unwrap();
    let result = &results[0];

    assert_eq!(result.domain, "example.com");
    assert!(result.error.is_none());
    assert_eq!(result.ns, vec!["ns1.example.com", "ns2.example.com"]);
    assert_eq!(result.mx, vec!["mx1.example.com", "mx2.example.com"]);
    assert!(result.spf.as_deref().unwrap().starts_with("v=spf1"));
    assert!(result.dmarc.as_deref().unwrap().starts_with("v=DMARC1"));
    assert!(result.dkim.is_some());
    assert!(result.bimi.is_some());
    assert!(result.mta_sts.is_some());
    assert!(result.mta_sts_policy.is_some());
    assert!(result.dnssec.is_some());
}

#[tokio::test]
async fn test_second_scan_is_served_from_cache() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));

    let first = scanner.scan(&["example.com"]).await.unwrap();
    let calls_after_first = client.calls();
    assert!(calls_after_first > 0);

    let second = scanner.scan(&["example.com"]).await.unwrap();
    assert_eq!(
        client.calls(),
        calls_after_first,
        "cached domain should not reach the DNS client"
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_zero_ttl_scans_again() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner_with(
        Arc::clone(&client),
        ScannerConfig {
            cache_ttl: Duration::ZERO,
            ..Default::default()
        },
    );

    scanner.scan(&["example.com"]).await.unwrap();
    let calls_after_first = client.calls();
    scanner.scan(&["example.com"]).await.unwrap();

    assert_eq!(client.calls(), calls_after_first * 2);
}

#[tokio::test]
async fn test_invalid_domain_reports_error_and_no_records() {
    let client = Arc::new(FakeDnsClient::new().with_invalid(&["nope.invalid"]));
    let scanner = test_scanner(Arc::clone(&client));

    let results = scanner.scan(&["nope.invalid", "example.com"]).await.unwrap();
    assert_eq!(results.len(), 2);

    let invalid = results.iter().find(|r| r.domain == "nope.invalid").unwrap();
    assert_eq!(invalid.error.as_deref(), Some("invalid domain"));
    assert!(invalid.ns.is_empty());
    assert!(invalid.mx.is_empty());
    assert!(invalid.spf.is_none());
    assert!(invalid.dkim.is_none());
    assert!(invalid.dmarc.is_none());
    assert!(invalid.mta_sts.is_none());

    let valid = results.iter().find(|r| r.domain == "example.com").unwrap();
    assert!(valid.error.is_none());
}

#[tokio::test]
async fn test_invalid_domain_result_is_cached() {
    let client = Arc::new(FakeDnsClient::new().with_invalid(&["nope.invalid"]));
    let scanner = test_scanner(Arc::clone(&client));

    scanner.scan(&["nope.invalid"]).await.unwrap();
    let calls_after_first = client.calls();

    let results = scanner.scan(&["nope.invalid"]).await.unwrap();
    assert_eq!(client.calls(), calls_after_first);
    assert_eq!(results[0].error.as_deref(), Some("invalid domain"));
}

#[tokio::test]
async fn test_failed_lookup_keeps_other_records() {
    let client = Arc::new(FakeDnsClient::new().with_failing(&[RecordKind::Spf]));
    let scanner = test_scanner(Arc::clone(&client));

    let results = scanner.scan(&["example.com"]).await.unwrap();
    let result = &results[0];

    assert!(result.spf.is_none());
    assert!(result.error.as_deref().unwrap().contains("spf:"));
    assert!(!result.mx.is_empty());
    assert!(result.dmarc.is_some());
    assert!(result.dkim.is_some());
    assert!(result.bimi.is_some());
    assert!(result.mta_sts.is_some());
}

#[tokio::test]
async fn test_empty_list_is_rejected() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));

    let empty: [&str; 0] = [];
    let result = scanner.scan(&empty).await;

    assert!(matches!(result, Err(ScanError::NoDomains)));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_empty_domain_is_rejected_without_lookups() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));

    let result = scanner.scan(&["example.com", ""]).await;

    assert!(matches!(result, Err(ScanError::EmptyDomain)));
    assert_eq!(client.calls(), 0, "no domain of the batch should be scanned");
}

#[tokio::test]
async fn test_scan_after_close_fails() {
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));
    scanner.scan(&["example.com"]).await.unwrap();

    scanner.close().await;
    let result = scanner.scan(&["example.com"]).await;

    match result {
        Err(e @ ScanError::Closed) => assert_eq!(e.to_string(), "scanner closed"),
        other => panic!("expected ScanError::Closed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_close_twice_is_safe() {
    let scanner = test_scanner(Arc::new(FakeDnsClient::new()));
    scanner.close().await;
    scanner.close().await;
    assert!(scanner.is_closed());
}

#[tokio::test]
async fn test_panicking_lookup_still_yields_a_result() {
    let client = Arc::new(FakeDnsClient::new().with_panicking(&["boom.example"]));
    let scanner = test_scanner(Arc::clone(&client));

    let results = scanner
        .scan(&["boom.example", "example.com"])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    let aborted = results.iter().find(|r| r.domain == "boom.example").unwrap();
    assert_eq!(aborted.error.as_deref(), Some("scan task aborted"));

    let valid = results.iter().find(|r| r.domain == "example.com").unwrap();
    assert!(valid.error.is_none());

    // The pool survives the panic
    let again = scanner.scan(&["example.org"]).await.unwrap();
    assert!(again[0].error.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pool_size_bounds_concurrent_domains() {
    let client = Arc::new(FakeDnsClient::new().with_delay(Duration::from_millis(20)));
    let scanner = test_scanner_with(
        Arc::clone(&client),
        ScannerConfig {
            pool_size: 3,
            cache_ttl: Duration::ZERO,
            ..Default::default()
        },
    );

    let domains: Vec<String> = (0..12).map(|i| format!("d{i}.example")).collect();
    let results = scanner.scan(domains.as_slice()).await.unwrap();

    assert_eq!(results.len(), 12);
    assert!(client.max_in_flight() <= 3, "at most 3 domains in flight");
    assert!(client.max_in_flight() >= 1);
}

#[tokio::test]
async fn test_scan_zone_skips_anchor_and_ns() {
    let zone = "\
example.com. 3600 IN NS ns1.example.com.
example.com. 3600 IN NS ns2.example.com.
mail.example.com. 3600 IN A 192.0.2.10
";
    let client = Arc::new(FakeDnsClient::new());
    let scanner = test_scanner(Arc::clone(&client));

    let results = scanner.scan_zone(zone.as_bytes()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "mail.example.com");
    assert_eq!(client.seen(), vec!["mail.example.com"]);
}

#[tokio::test]
async fn test_scan_zone_without_scannable_names() {
    let zone = "example.com. 3600 IN NS ns1.example.com.\n";
    let scanner = test_scanner(Arc::new(FakeDnsClient::new()));

    let result = scanner.scan_zone(zone.as_bytes()).await;
    assert!(matches!(result, Err(ScanError::NoDomains)));
}
