//! In-memory cache of scan results.
//!
//! A plain TTL map keyed by domain name. There is no size bound and no LRU;
//! entries live until they expire or the cache is flushed. Expiry uses
//! `tokio::time::Instant`, so paused test clocks apply.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::scanner::ScanResult;

/// A cached scan result and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached result
    pub result: ScanResult,
    /// When the entry expires
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Cache-aside store for scan results.
///
/// A zero TTL disables the cache: `get` always misses and `set` stores
/// nothing. Once [`close`](Self::close)d, the cache stays empty.
#[derive(Debug)]
pub struct ScanCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Only changed while holding the `entries` write lock
    closed: AtomicBool,
}

impl ScanCache {
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        ScanCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns `true` unless the cache was created with a zero TTL.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns the cached result for `domain` if it has not expired.
    ///
    /// An expired entry is removed on the way out.
    pub async fn get(&self, domain: &str) -> Option<ScanResult> {
        if !self.is_enabled() {
            return None;
        }

        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(domain) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.result.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Re-check under the write lock: another task may have refreshed it
        let mut entries = self.entries.write().await;
        if entries
            .get(domain)
            .is_some_and(|entry| entry.is_expired(now))
        {
            entries.remove(domain);
        }
        None
    }

    /// Stores `result` under `domain`, replacing any previous entry.
    pub async fn set(&self, domain: &str, result: ScanResult) {
        if !self.is_enabled() {
            return;
        }

        let entry = CacheEntry {
            result,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.write().await;
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        entries.insert(domain.to_string(), entry);
    }

    /// Evicts every entry.
    pub async fn flush(&self) {
        self.entries.write().await.clear();
    }

    /// Evicts every entry and ignores all later writes.
    ///
    /// Results of scans still in flight are dropped instead of stored.
    pub async fn close(&self) {
        let mut entries = self.entries.write().await;
        self.closed.store(true, Ordering::SeqCst);
        entries.clear();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of stored entries, including ones that expired but were not
    /// looked up since.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
