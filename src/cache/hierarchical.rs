use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::lru::LruCache;

/// Inclusive two-level LRU. Misses land in L2 only; an L2 hit promotes a copy
/// into L1, so every key resident in L1 is also resident in L2. `put` writes
/// to L2 and lets the next read promote.
pub struct HierarchicalLruCache {
    l1: LruCache,
    l2: LruCache,
    l1_hits: u64,
    l2_hits: u64,
    misses: u64,
}

impl HierarchicalLruCache {
    #[must_use]
    pub fn new(l1_capacity_bytes: u64, l2_capacity_bytes: u64) -> Self {
        Self {
            l1: LruCache::new(l1_capacity_bytes),
            l2: LruCache::new(l2_capacity_bytes),
            l1_hits: 0,
            l2_hits: 0,
            misses: 0,
        }
    }
}

impl Cache for HierarchicalLruCache {
    fn get(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.l1.contains(key) {
            self.l1_hits += 1;
            self.l1.get(key, size_bytes, metadata);
            return CacheLookup::hit(CacheLevel::L1);
        }
        if self.l2.contains(key) {
            self.l2_hits += 1;
            self.l2.get(key, size_bytes, metadata);
            // Promote into L1 while keeping the L2 copy.
            self.l1.get(key, size_bytes, metadata);
            return CacheLookup::hit(CacheLevel::L2);
        }
        self.misses += 1;
        self.l2.get(key, size_bytes, metadata);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) {
        self.l2.put(key, size_bytes, metadata);
    }

    fn stats(&self) -> CacheStats {
        let l1 = self.l1.stats();
        let l2 = self.l2.stats();
        CacheStats::new(
            self.l1_hits + self.l2_hits,
            self.misses,
            l1.used_bytes + l2.used_bytes,
            l1.capacity_bytes + l2.capacity_bytes,
            l1.items + l2.items,
        )
        .with_extra("l1_hits", self.l1_hits)
        .with_extra("l2_hits", self.l2_hits)
        .with_extra("l1_used_bytes", l1.used_bytes)
        .with_extra("l1_capacity_bytes", l1.capacity_bytes)
        .with_extra("l2_used_bytes", l2.used_bytes)
        .with_extra("l2_capacity_bytes", l2.capacity_bytes)
    }
}
