use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use std::collections::{HashMap, VecDeque};

/// CLOCK second-chance eviction. Each resident key carries a reference bit,
/// set on hit and on admission. The sweep clears set bits and rotates until
/// it finds a clear one to reclaim. Keys removed out-of-band leave stale ring
/// slots that the sweep skips.
pub struct ClockCache {
    capacity_bytes: u64,
    items: HashMap<u64, u64>,
    ref_bits: HashMap<u64, bool>,
    ring: VecDeque<u64>,
    used_bytes: u64,
    hits: u64,
    misses: u64,
}

enum Sweep {
    Stale,
    Rotate,
    Evict,
}

impl ClockCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            items: HashMap::new(),
            ref_bits: HashMap::new(),
            ring: VecDeque::new(),
            used_bytes: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.used_bytes + size_bytes > self.capacity_bytes && !self.items.is_empty() {
            self.evict_one();
        }
        self.items.insert(key, size_bytes);
        self.ref_bits.insert(key, true);
        self.ring.push_back(key);
        self.used_bytes += size_bytes;
    }

    fn evict_one(&mut self) {
        while let Some(&candidate) = self.ring.front() {
            let step = if !self.items.contains_key(&candidate) {
                Sweep::Stale
            } else if self.ref_bits.get(&candidate).copied().unwrap_or(false) {
                self.ref_bits.insert(candidate, false);
                Sweep::Rotate
            } else {
                Sweep::Evict
            };
            match step {
                Sweep::Stale => {
                    self.ring.pop_front();
                }
                Sweep::Rotate => {
                    if let Some(front) = self.ring.pop_front() {
                        self.ring.push_back(front);
                    }
                }
                Sweep::Evict => {
                    self.ring.pop_front();
                    if let Some(size) = self.items.remove(&candidate) {
                        self.used_bytes -= size;
                    }
                    self.ref_bits.remove(&candidate);
                    return;
                }
            }
        }
    }
}

impl Cache for ClockCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.items.contains_key(&key) {
            self.ref_bits.insert(key, true);
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        if let Some(size) = self.items.remove(&key) {
            self.used_bytes -= size;
            self.ref_bits.remove(&key);
        }
        self.admit(key, size_bytes);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.used_bytes,
            self.capacity_bytes,
            self.items.len(),
        )
    }
}
