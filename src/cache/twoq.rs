use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;

/// 2Q: new keys enter the FIFO probation queue A1in, a second access promotes
/// into the LRU-managed Am, and evicted keys linger in the A1out ghost so a
/// re-reference can skip probation entirely. Ghost entries hold key and size
/// only and are bounded separately from resident bytes.
pub struct TwoQCache {
    capacity_bytes: u64,
    a1in_capacity: u64,
    a1out_capacity: u64,
    a1in: ByteLru,
    am: ByteLru,
    a1out: ByteLru,
    hits: u64,
    misses: u64,
}

impl TwoQCache {
    #[must_use]
    pub fn new(capacity_bytes: u64, a1in_fraction: f64, a1out_fraction: f64) -> Self {
        Self {
            capacity_bytes,
            a1in_capacity: (capacity_bytes as f64 * a1in_fraction.clamp(0.0, 1.0)) as u64,
            a1out_capacity: (capacity_bytes as f64 * a1out_fraction.clamp(0.0, 1.0)) as u64,
            a1in: ByteLru::new(),
            am: ByteLru::new(),
            a1out: ByteLru::new(),
            hits: 0,
            misses: 0,
        }
    }

    fn insert_a1in(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        self.a1in.insert(key, size_bytes);
        self.evict_if_needed();
    }

    fn insert_am(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        self.am.insert(key, size_bytes);
        self.evict_if_needed();
    }

    fn evict_if_needed(&mut self) {
        while self.a1in.used_bytes() + self.am.used_bytes() > self.capacity_bytes {
            let victim = if !self.a1in.is_empty() && self.a1in.used_bytes() > self.a1in_capacity {
                self.a1in.pop_oldest()
            } else if !self.am.is_empty() {
                self.am.pop_oldest()
            } else if !self.a1in.is_empty() {
                self.a1in.pop_oldest()
            } else {
                return;
            };
            if let Some((key, size)) = victim {
                self.a1out.insert(key, size);
                self.trim_a1out();
            }
        }
    }

    fn trim_a1out(&mut self) {
        while self.a1out.used_bytes() > self.a1out_capacity && !self.a1out.is_empty() {
            self.a1out.pop_oldest();
        }
    }
}

impl Cache for TwoQCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.am.touch(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        if let Some(size) = self.a1in.remove(key) {
            self.am.insert(key, size);
            self.hits += 1;
            self.evict_if_needed();
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        if self.a1out.remove(key).is_some() {
            self.insert_am(key, size_bytes);
        } else {
            self.insert_a1in(key, size_bytes);
        }
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        if self.am.remove(key).is_some() {
            self.insert_am(key, size_bytes);
        } else if self.a1in.remove(key).is_some() {
            self.insert_a1in(key, size_bytes);
        } else if self.a1out.remove(key).is_some() {
            self.insert_am(key, size_bytes);
        } else {
            self.insert_a1in(key, size_bytes);
        }
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.a1in.used_bytes() + self.am.used_bytes(),
            self.capacity_bytes,
            self.a1in.len() + self.am.len(),
        )
        .with_extra("a1in_bytes", self.a1in.used_bytes())
        .with_extra("am_bytes", self.am.used_bytes())
    }
}
