use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;
use std::collections::{HashMap, VecDeque};

/// LRU-K eviction. A logical clock ticks on every operation (gets and puts
/// alike) and each key keeps its `k` most recent access timestamps. The
/// victim is the key with the smallest k-th most recent access; keys with
/// fewer than `k` accesses score by their last access, and keys never seen
/// before score lowest of all. History survives eviction, so a readmitted key
/// keeps credit for earlier accesses. Ties go to the earliest-admitted key.
pub struct LrukCache {
    capacity_bytes: u64,
    k: usize,
    entries: ByteLru,
    history: HashMap<u64, VecDeque<i64>>,
    clock: i64,
    hits: u64,
    misses: u64,
}

impl LrukCache {
    #[must_use]
    pub fn new(capacity_bytes: u64, k: usize) -> Self {
        Self {
            capacity_bytes,
            k: k.max(1),
            entries: ByteLru::new(),
            history: HashMap::new(),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn record_access(&mut self, key: u64, ts: i64) {
        let history = self.history.entry(key).or_default();
        history.push_back(ts);
        while history.len() > self.k {
            history.pop_front();
        }
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.entries.used_bytes() + size_bytes > self.capacity_bytes
            && !self.entries.is_empty()
        {
            self.evict();
        }
        self.entries.insert(key, size_bytes);
    }

    fn evict(&mut self) {
        let mut victim: Option<(u64, i64)> = None;
        for key in self.entries.keys_oldest_first() {
            let score = match self.history.get(&key) {
                Some(history) if history.len() >= self.k => {
                    history.front().copied().unwrap_or(-1)
                }
                Some(history) => history.back().copied().unwrap_or(-1),
                None => -1,
            };
            match victim {
                Some((_, best)) if score >= best => {}
                _ => victim = Some((key, score)),
            }
        }
        if let Some((key, _)) = victim {
            self.entries.remove(key);
        }
    }
}

impl Cache for LrukCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        self.clock += 1;
        self.record_access(key, self.clock);
        if self.entries.contains(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        self.clock += 1;
        self.record_access(key, self.clock);
        self.entries.remove(key);
        self.admit(key, size_bytes);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.entries.used_bytes(),
            self.capacity_bytes,
            self.entries.len(),
        )
        .with_extra("k", self.k as u64)
    }
}
