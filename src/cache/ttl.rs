use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;
use std::collections::HashMap;

/// Time-to-live expiry over a recency-ordered backbone.
///
/// The clock advances from `metadata.timestamp_ms` when the workload carries
/// wall-clock arrivals; otherwise it ticks once per operation. Expired keys
/// are dropped lazily: on the access that finds them stale, and in a purge
/// before each admission. With `ttl_ms == 0` expiry is disabled and hits do
/// not refresh recency, leaving plain FIFO order.
pub struct TtlCache {
    capacity_bytes: u64,
    ttl_ms: i64,
    entries: ByteLru,
    expiry: HashMap<u64, i64>,
    now: i64,
    hits: u64,
    misses: u64,
}

impl TtlCache {
    #[must_use]
    pub fn new(capacity_bytes: u64, ttl_ms: i64) -> Self {
        Self {
            capacity_bytes,
            ttl_ms: ttl_ms.max(0),
            entries: ByteLru::new(),
            expiry: HashMap::new(),
            now: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn advance(&mut self, metadata: Option<&CacheMetadata>) -> i64 {
        match metadata.and_then(|m| m.timestamp_ms) {
            Some(ts) if ts > 0 => self.now = ts,
            _ => self.now += 1,
        }
        self.now
    }

    fn is_expired(&self, key: u64, now: i64) -> bool {
        self.expiry.get(&key).is_some_and(|&deadline| now >= deadline)
    }

    fn purge_expired(&mut self, now: i64) {
        let stale: Vec<u64> = self
            .expiry
            .iter()
            .filter(|&(_, &deadline)| now >= deadline)
            .map(|(&key, _)| key)
            .collect();
        for key in stale {
            self.remove(key);
        }
    }

    fn remove(&mut self, key: u64) {
        self.entries.remove(key);
        self.expiry.remove(&key);
    }

    fn admit(&mut self, key: u64, size_bytes: u64, now: i64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        let deadline = if self.ttl_ms > 0 {
            self.purge_expired(now);
            Some(now + self.ttl_ms)
        } else {
            None
        };
        while self.entries.used_bytes() + size_bytes > self.capacity_bytes
            && !self.entries.is_empty()
        {
            if let Some((evicted, _)) = self.entries.pop_oldest() {
                self.expiry.remove(&evicted);
            }
        }
        self.entries.insert(key, size_bytes);
        if let Some(deadline) = deadline {
            self.expiry.insert(key, deadline);
        }
    }
}

impl Cache for TtlCache {
    fn get(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) -> CacheLookup {
        let now = self.advance(metadata);
        if self.entries.contains(key) {
            if self.is_expired(key, now) {
                self.remove(key);
            } else {
                if self.ttl_ms > 0 {
                    self.entries.touch(key);
                }
                self.hits += 1;
                return CacheLookup::hit(CacheLevel::L1);
            }
        }
        self.misses += 1;
        self.admit(key, size_bytes, now);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) {
        let now = self.advance(metadata);
        if self.entries.contains(key) {
            self.remove(key);
        }
        self.admit(key, size_bytes, now);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.entries.used_bytes(),
            self.capacity_bytes,
            self.entries.len(),
        )
        .with_extra("ttl_ms", self.ttl_ms.max(0) as u64)
    }
}
