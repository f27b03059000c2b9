use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;

/// Least-recently-used eviction; hits refresh recency.
pub struct LruCache {
    capacity_bytes: u64,
    entries: ByteLru,
    hits: u64,
    misses: u64,
}

impl LruCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self { capacity_bytes, entries: ByteLru::new(), hits: 0, misses: 0 }
    }

    pub(crate) fn contains(&self, key: u64) -> bool {
        self.entries.contains(key)
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.entries.used_bytes() + size_bytes > self.capacity_bytes
            && !self.entries.is_empty()
        {
            self.entries.pop_oldest();
        }
        self.entries.insert(key, size_bytes);
    }
}

impl Cache for LruCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.entries.touch(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
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
    }
}

/// Insertion-order eviction; hits do not reorder.
pub struct FifoCache {
    capacity_bytes: u64,
    entries: ByteLru,
    hits: u64,
    misses: u64,
}

impl FifoCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self { capacity_bytes, entries: ByteLru::new(), hits: 0, misses: 0 }
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.entries.used_bytes() + size_bytes > self.capacity_bytes
            && !self.entries.is_empty()
        {
            self.entries.pop_oldest();
        }
        self.entries.insert(key, size_bytes);
    }
}

impl Cache for FifoCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.entries.contains(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
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
    }
}

/// Most-recently-used eviction: hits refresh recency, but pressure removes
/// the newest entry instead of the oldest.
pub struct MruCache {
    capacity_bytes: u64,
    entries: ByteLru,
    hits: u64,
    misses: u64,
}

impl MruCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self { capacity_bytes, entries: ByteLru::new(), hits: 0, misses: 0 }
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.entries.used_bytes() + size_bytes > self.capacity_bytes
            && !self.entries.is_empty()
        {
            self.entries.pop_newest();
        }
        self.entries.insert(key, size_bytes);
    }
}

impl Cache for MruCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.entries.touch(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
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
    }
}
