use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::cache::ordered::ByteLru;

/// Adaptive Replacement Cache. T1 holds once-seen keys, T2 holds re-referenced
/// keys, and the B1/B2 ghosts remember recent evictions from each. The split
/// point `p` is the byte budget T1 is allowed before `replace` prefers it as
/// the victim side; ghost hits nudge `p` by the ghost entry's byte size
/// rather than the unit step of the paper.
pub struct ArcCache {
    capacity_bytes: u64,
    p: u64,
    t1: ByteLru,
    t2: ByteLru,
    b1: ByteLru,
    b2: ByteLru,
    hits: u64,
    misses: u64,
}

impl ArcCache {
    #[must_use]
    pub fn new(capacity_bytes: u64, p_init_fraction: f64) -> Self {
        Self {
            capacity_bytes,
            p: (capacity_bytes as f64 * p_init_fraction.clamp(0.0, 1.0)) as u64,
            t1: ByteLru::new(),
            t2: ByteLru::new(),
            b1: ByteLru::new(),
            b2: ByteLru::new(),
            hits: 0,
            misses: 0,
        }
    }

    fn adapt_p(&mut self, increase: bool, ghost_size: u64) {
        let delta = ghost_size.max(1);
        if increase {
            self.p = (self.p + delta).min(self.capacity_bytes);
        } else {
            self.p = self.p.saturating_sub(delta);
        }
    }

    /// Frees space for `key`, steering the victim side by `p`. The B2 check
    /// runs after any ghost hit on `key` was already popped, so a key being
    /// readmitted from B2 does not satisfy its own tie-break.
    fn replace(&mut self, key: u64) {
        while self.t1.used_bytes() + self.t2.used_bytes() >= self.capacity_bytes
            && (!self.t1.is_empty() || !self.t2.is_empty())
        {
            let from_t1 = !self.t1.is_empty()
                && (self.t1.used_bytes() > self.p
                    || (self.b2.contains(key) && self.t1.used_bytes() == self.p));
            if from_t1 {
                if let Some((evicted, size)) = self.t1.pop_oldest() {
                    self.b1.insert(evicted, size);
                    trim_ghost(&mut self.b1, self.capacity_bytes);
                }
            } else if !self.t2.is_empty() {
                if let Some((evicted, size)) = self.t2.pop_oldest() {
                    self.b2.insert(evicted, size);
                    trim_ghost(&mut self.b2, self.capacity_bytes);
                }
            } else {
                return;
            }
        }
    }

    fn insert_t1(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        self.t1.insert(key, size_bytes);
    }

    fn insert_t2(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        self.t2.insert(key, size_bytes);
    }
}

impl Cache for ArcCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if let Some(size) = self.t1.remove(key) {
            self.t2.insert(key, size);
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }
        if self.t2.touch(key) {
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }

        self.misses += 1;
        if let Some(ghost_size) = self.b1.remove(key) {
            self.adapt_p(true, ghost_size);
            self.replace(key);
            self.insert_t2(key, size_bytes);
            return CacheLookup::miss();
        }
        if let Some(ghost_size) = self.b2.remove(key) {
            self.adapt_p(false, ghost_size);
            self.replace(key);
            self.insert_t2(key, size_bytes);
            return CacheLookup::miss();
        }
        self.replace(key);
        self.insert_t1(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        if self.t1.remove(key).is_some() || self.t2.remove(key).is_some() {
            self.insert_t2(key, size_bytes);
            return;
        }
        if self.b1.remove(key).is_some() || self.b2.remove(key).is_some() {
            self.replace(key);
            self.insert_t2(key, size_bytes);
            return;
        }
        self.replace(key);
        self.insert_t1(key, size_bytes);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.t1.used_bytes() + self.t2.used_bytes(),
            self.capacity_bytes,
            self.t1.len() + self.t2.len(),
        )
        .with_extra("p_bytes", self.p)
    }
}

fn trim_ghost(ghost: &mut ByteLru, capacity_bytes: u64) {
    while ghost.used_bytes() > capacity_bytes && !ghost.is_empty() {
        ghost.pop_oldest();
    }
}
