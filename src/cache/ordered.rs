use lru::LruCache;

/// Recency-ordered key-to-size map with byte accounting, shared by the
/// queue-shaped policies (LRU, FIFO, MRU, TTL, the 2Q/ARC lists and ghosts,
/// priority buckets, tenant partitions, hierarchy layers).
///
/// `insert` and `touch` move a key to the most-recent end; `contains`/`peek`
/// leave the order alone so FIFO-style callers can share the structure.
pub(crate) struct ByteLru {
    entries: LruCache<u64, u64>,
    used_bytes: u64,
}

impl ByteLru {
    pub fn new() -> Self {
        Self { entries: LruCache::unbounded(), used_bytes: 0 }
    }

    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains(&key)
    }

    /// Moves `key` to the most-recent end. Returns whether it was present.
    pub fn touch(&mut self, key: u64) -> bool {
        self.entries.get(&key).is_some()
    }

    /// Inserts at the most-recent end, replacing any existing entry's size.
    pub fn insert(&mut self, key: u64, size_bytes: u64) {
        if let Some(old) = self.entries.put(key, size_bytes) {
            self.used_bytes -= old;
        }
        self.used_bytes += size_bytes;
    }

    pub fn remove(&mut self, key: u64) -> Option<u64> {
        let size = self.entries.pop(&key)?;
        self.used_bytes -= size;
        Some(size)
    }

    pub fn pop_oldest(&mut self) -> Option<(u64, u64)> {
        let (key, size) = self.entries.pop_lru()?;
        self.used_bytes -= size;
        Some((key, size))
    }

    pub fn pop_newest(&mut self) -> Option<(u64, u64)> {
        let key = *self.entries.iter().next()?.0;
        let size = self.entries.pop(&key)?;
        self.used_bytes -= size;
        Some((key, size))
    }

    /// Keys from least- to most-recently used.
    pub fn keys_oldest_first(&self) -> Vec<u64> {
        let mut keys: Vec<u64> = self.entries.iter().map(|(k, _)| *k).collect();
        keys.reverse();
        keys
    }

    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ByteLru {
    fn default() -> Self {
        Self::new()
    }
}
