use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which tier served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLevel {
    L1,
    L2,
    Miss,
}

impl CacheLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::Miss => "miss",
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLookup {
    pub hit: bool,
    pub level: CacheLevel,
}

impl CacheLookup {
    #[must_use]
    pub const fn hit(level: CacheLevel) -> Self {
        Self { hit: true, level }
    }

    #[must_use]
    pub const fn miss() -> Self {
        Self { hit: false, level: CacheLevel::Miss }
    }
}

impl Default for CacheLookup {
    fn default() -> Self {
        Self::miss()
    }
}

/// Per-operation hints. Policies consume only the fields they care about:
/// TTL reads `timestamp_ms`, priority-LRU reads `priority` and `pinned`,
/// tenant-partitioned LRU reads `tenant_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    pub timestamp_ms: Option<i64>,
    pub priority: i64,
    pub pinned: bool,
    pub tenant_id: Option<String>,
}

/// Counter snapshot common to every policy. Policy-specific gauges (adaptive
/// split points, ghost sizes, per-layer occupancy) land in `extra`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub used_bytes: u64,
    pub capacity_bytes: u64,
    pub items: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<&'static str, u64>,
}

impl CacheStats {
    pub(crate) fn new(
        hits: u64,
        misses: u64,
        used_bytes: u64,
        capacity_bytes: u64,
        items: usize,
    ) -> Self {
        let total = hits + misses;
        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };
        Self { hits, misses, hit_rate, used_bytes, capacity_bytes, items, extra: BTreeMap::new() }
    }

    pub(crate) fn with_extra(mut self, key: &'static str, value: u64) -> Self {
        self.extra.insert(key, value);
        self
    }
}

/// A byte-capacity cache with metadata-aware lookup, insertion, and
/// statistics.
///
/// `get` admits the key on a miss; `put` installs or replaces without
/// touching the hit/miss counters. Entries larger than the whole cache are
/// silently refused and evict nothing.
pub trait Cache {
    /// Looks up `key`, updating recency/frequency state according to policy.
    fn get(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>) -> CacheLookup;

    /// Inserts or replaces an entry without counting a hit or a miss.
    fn put(&mut self, key: u64, size_bytes: u64, metadata: Option<&CacheMetadata>);

    /// Snapshot of counters and occupancy.
    fn stats(&self) -> CacheStats;
}
