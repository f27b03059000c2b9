use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use std::collections::{BTreeMap, HashMap};

/// Insertion-ordered key set; keys are only ever appended and popped from the
/// oldest end, so recency never diverges from insertion order.
type KeyQueue = lru::LruCache<u64, ()>;

/// Least-frequently-used eviction with insertion-ordered frequency buckets.
/// Ties inside the minimum-frequency bucket break toward the oldest key.
pub struct LfuCache {
    capacity_bytes: u64,
    items: HashMap<u64, u64>,
    freq: HashMap<u64, u64>,
    buckets: BTreeMap<u64, KeyQueue>,
    used_bytes: u64,
    min_freq: u64,
    hits: u64,
    misses: u64,
}

impl LfuCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            items: HashMap::new(),
            freq: HashMap::new(),
            buckets: BTreeMap::new(),
            used_bytes: 0,
            min_freq: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn bump_freq(&mut self, key: u64) {
        let freq = self.freq.get(&key).copied().unwrap_or(0);
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            bucket.pop(&key);
            if bucket.is_empty() && self.min_freq == freq {
                self.min_freq += 1;
            }
        }
        let new_freq = freq + 1;
        self.freq.insert(key, new_freq);
        self.buckets.entry(new_freq).or_insert_with(KeyQueue::unbounded).put(key, ());
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.used_bytes + size_bytes > self.capacity_bytes && !self.items.is_empty() {
            if !self.evict() {
                break;
            }
        }
        self.items.insert(key, size_bytes);
        self.used_bytes += size_bytes;
        self.freq.insert(key, 1);
        self.buckets.entry(1).or_insert_with(KeyQueue::unbounded).put(key, ());
        self.min_freq = 1;
    }

    fn evict(&mut self) -> bool {
        let Some(bucket) = self.buckets.get_mut(&self.min_freq) else {
            return false;
        };
        let Some((key, ())) = bucket.pop_lru() else {
            return false;
        };
        let emptied = bucket.is_empty();
        if let Some(size) = self.items.remove(&key) {
            self.used_bytes -= size;
        }
        self.freq.remove(&key);
        if emptied {
            self.buckets.remove(&self.min_freq);
        }
        true
    }
}

impl Cache for LfuCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if self.items.contains_key(&key) {
            self.hits += 1;
            self.bump_freq(key);
            return CacheLookup::hit(CacheLevel::L1);
        }
        self.misses += 1;
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        if let Some(existing) = self.items.get_mut(&key) {
            self.used_bytes -= *existing;
            *existing = size_bytes;
            self.used_bytes += size_bytes;
            self.bump_freq(key);
            return;
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
