use crate::cache::interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use std::collections::{HashMap, HashSet, VecDeque};

struct Slot {
    size: u64,
    referenced: bool,
    hot: bool,
}

/// CLOCK-Pro: a single ring of hot and cold entries plus a ghost FIFO of
/// recently evicted cold keys. A ghost re-reference grows the hot byte target
/// by the incoming size; an unseen miss shrinks it. New entries always start
/// cold with the reference bit set.
///
/// During the sweep, a referenced cold entry may be promoted to hot without
/// demoting anything in the same pass, so `hot_bytes` can transiently exceed
/// `hot_target` until a later sweep demotes an unreferenced hot entry.
pub struct ClockProCache {
    capacity_bytes: u64,
    entries: HashMap<u64, Slot>,
    ring: VecDeque<u64>,
    ghost: VecDeque<u64>,
    ghost_keys: HashSet<u64>,
    used_bytes: u64,
    hot_bytes: u64,
    hot_target: u64,
    hits: u64,
    misses: u64,
}

enum Sweep {
    Stale,
    Rotate,
    Evict,
}

impl ClockProCache {
    #[must_use]
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            entries: HashMap::new(),
            ring: VecDeque::new(),
            ghost: VecDeque::new(),
            ghost_keys: HashSet::new(),
            used_bytes: 0,
            hot_bytes: 0,
            hot_target: capacity_bytes / 2,
            hits: 0,
            misses: 0,
        }
    }

    fn forget_ghost(&mut self, key: u64) {
        if let Some(pos) = self.ghost.iter().position(|&k| k == key) {
            self.ghost.remove(pos);
        }
    }

    fn admit(&mut self, key: u64, size_bytes: u64) {
        if size_bytes > self.capacity_bytes {
            return;
        }
        while self.used_bytes + size_bytes > self.capacity_bytes && !self.entries.is_empty() {
            self.evict_one();
        }
        self.entries.insert(key, Slot { size: size_bytes, referenced: true, hot: false });
        self.ring.push_back(key);
        self.used_bytes += size_bytes;
    }

    fn evict_one(&mut self) {
        while let Some(&candidate) = self.ring.front() {
            let step = match self.entries.get_mut(&candidate) {
                None => Sweep::Stale,
                Some(slot) if slot.referenced => {
                    slot.referenced = false;
                    if !slot.hot && self.hot_bytes < self.hot_target {
                        slot.hot = true;
                        self.hot_bytes += slot.size;
                    }
                    Sweep::Rotate
                }
                Some(slot) if slot.hot => {
                    slot.hot = false;
                    self.hot_bytes -= slot.size;
                    Sweep::Rotate
                }
                Some(_) => Sweep::Evict,
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
                    if let Some(slot) = self.entries.remove(&candidate) {
                        self.used_bytes -= slot.size;
                    }
                    self.ghost.push_back(candidate);
                    self.ghost_keys.insert(candidate);
                    self.trim_ghost();
                    return;
                }
            }
        }
    }

    fn trim_ghost(&mut self) {
        while self.ghost.len() > 2 * self.entries.len() {
            match self.ghost.pop_front() {
                Some(old) => {
                    self.ghost_keys.remove(&old);
                }
                None => break,
            }
        }
    }
}

impl Cache for ClockProCache {
    fn get(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) -> CacheLookup {
        if let Some(slot) = self.entries.get_mut(&key) {
            slot.referenced = true;
            if !slot.hot {
                slot.hot = true;
                self.hot_bytes += slot.size;
            }
            self.hits += 1;
            return CacheLookup::hit(CacheLevel::L1);
        }

        self.misses += 1;
        if self.ghost_keys.remove(&key) {
            self.forget_ghost(key);
            self.hot_target = (self.hot_target + size_bytes).min(self.capacity_bytes);
        } else {
            self.hot_target = self.hot_target.saturating_sub(size_bytes);
        }
        self.admit(key, size_bytes);
        CacheLookup::miss()
    }

    fn put(&mut self, key: u64, size_bytes: u64, _metadata: Option<&CacheMetadata>) {
        if let Some(slot) = self.entries.remove(&key) {
            self.used_bytes -= slot.size;
            if slot.hot {
                self.hot_bytes -= slot.size;
            }
            if let Some(pos) = self.ring.iter().position(|&k| k == key) {
                self.ring.remove(pos);
            }
        }
        self.admit(key, size_bytes);
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.hits,
            self.misses,
            self.used_bytes,
            self.capacity_bytes,
            self.entries.len(),
        )
        .with_extra("hot_target_bytes", self.hot_target)
    }
}
