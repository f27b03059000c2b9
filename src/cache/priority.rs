use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Priority-bucketed LRU with advisory pinning. Each priority level keeps its
/// own recency order; eviction scans levels lowest-first and takes the least
/// recent non-pinned key. When every resident key is pinned, the lowest
/// level's LRU key is evicted anyway, so pins shape victim order but never
/// block admission. A key's priority is fixed at admission and not
/// reclassified by later hits.
pub struct PriorityLruCache {
    capacity_bytes: u64,
    buckets: BTreeMap<i64, ByteLru>,
    priorities: HashMap<u64, i64>,
    pinned: HashSet<u64>,
    used_bytes: u64,
    hits: u64,
    misses: u64,
}

impl PriorityLruCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            buckets: BTreeMap::new(),
            priorities: HashMap::new(),
            pinned: HashSet::new(),
            used_bytes: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn admit(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        let priority = metadata.map_or(0, |m| m.priority);
        if metadata.is_some_and(|m| m.pinned) {
            self.pinned.insert(key);
        }
        self.evict_if_needed(size_bytes);
        self.priorities.insert(key, priority);
        self.buckets.entry(priority).or_default().insert(key, size_bytes);
        self.used_bytes += size_bytes;
    }

    fn evict_if_needed(&mut self, incoming_size: u64) {
        while self.used_bytes + incoming_size > self.capacity_bytes {
            let Some((key, priority)) = self.select_victim() else {
                return;
            };
            if let Some(bucket) = self.buckets.get_mut(&priority) {
                if let Some(size) = bucket.remove(key) {
                    self.used_bytes -= size;
                }
                if bucket.is_empty() {
                    self.buckets.remove(&priority);
                }
            }
            self.priorities.remove(&key);
            self.pinned.remove(&key);
        }
    }

    fn select_victim(&self) -> Option<(u64, i64)> {
        for (&priority, bucket) in &self.buckets {
            for key in bucket.keys_oldest_first() {
                if !self.pinned.contains(&key) {
                    return Some((key, priority));
                }
            }
        }
        // Everything is pinned: fall back to the lowest priority anyway.
        for (&priority, bucket) in &self.buckets {
            if let Some(key) = bucket.keys_oldest_first().into_iter().next() {
                return Some((key, priority));
            }
        }
        None
    }
}

impl Cache for PriorityLruCache {
    fn get(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) -> CacheLookup {
        if let Some(&priority) = self.priorities.get(&key) {
            if let Some(bucket) = self.buckets.get_mut(&priority) {
                bucket.touch(key);
            }
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes, metadata);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) {
        if let Some(&priority) = self.priorities.get(&key)
            && let Some(bucket) = self.buckets.get_mut(&priority)
            && let Some(existing) = bucket.remove(key)
        {
            self.used_bytes -= existing;
        }
        self.admit(key, size_bytes, metadata);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.used_bytes,
            self.capacity_bytes,
            self.priorities.len(),
        )
        .with_extra("pinned", self.pinned.len() as u64)
    }
}
