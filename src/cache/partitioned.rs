use crate::cache::interfaces::{Cache, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::lru::LruCache;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Tenant-partitioned LRU: a fixed number of independent LRU partitions, each
/// sized an equal share of the total capacity. Tenants map to partitions by
/// hash; requests without a tenant share partition 0. The hasher is seeded
/// deterministically so partition assignment is stable across runs.
pub struct PartitionedLruCache {
    capacity_bytes: u64,
    partitions: Vec<LruCache>,
    hits: u64,
    misses: u64,
}

impl PartitionedLruCache {
    #[must_use]
    pub fn new(capacity_bytes: u64, partitions: usize) -> Self {
        let count = partitions.max(1);
        let per_partition = capacity_bytes / count as u64;
        Self {
            capacity_bytes,
            partitions: (0..count).map(|_| LruCache::new(per_partition)).collect(),
            hits: 0,
            misses: 0,
        }
    }

    fn select_partition(&self, metadata: Option<&CacheMetadata>) -> usize {
        let Some(tenant) = metadata.and_then(|m| m.tenant_id.as_deref()) else {
            return 0;
        };
        let mut hasher = DefaultHasher::new();
        tenant.hash(&mut hasher);
        (hasher.finish() % self.partitions.len() as u64) as usize
    }
}

impl Cache for PartitionedLruCache {
    fn get(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) -> CacheLookup {
        let idx = self.select_partition(metadata);
        let result = self.partitions[idx].get(key, size_bytes, metadata);
        if result.hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        result
    }

    fn put(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) {
        let idx = self.select_partition(metadata);
        self.partitions[idx].put(key, size_bytes, metadata);
    }

    fn stats(&self) -> CacheStats {
        let mut used_bytes = 0;
        let mut items = 0;
        for partition in &self.partitions {
            let stats = partition.stats();
            used_bytes += stats.used_bytes;
            items += stats.items;
        }
        CacheStats::new(self.hits, self.misses, used_bytes, self.capacity_bytes, items)
            .with_extra("partitions", self.partitions.len() as u64)
    }
}
