use kvsim::cache::{Cache, FifoCache, LruCache, MruCache};

#[test]
fn lru_evicts_least_recently_used() {
    let mut cache = LruCache::new(300);
    assert!(!cache.get(1, 100, None).hit);
    assert!(!cache.get(2, 100, None).hit);
    assert!(!cache.get(3, 100, None).hit);
    assert!(cache.get(1, 100, None).hit);
    assert!(!cache.get(4, 100, None).hit);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.used_bytes, 300);
    assert_eq!(stats.items, 3);

    // Key 2 was least recently used when 4 arrived; 3, 1, 4 remain.
    assert!(!cache.get(2, 100, None).hit);
    assert!(cache.get(1, 100, None).hit);
    assert!(cache.get(4, 100, None).hit);
}

#[test]
fn lru_put_replaces_without_counting_hits() {
    let mut cache = LruCache::new(300);
    cache.put(1, 100, None);
    cache.put(1, 250, None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.used_bytes, 250);
    assert_eq!(stats.items, 1);
    assert!(cache.get(1, 250, None).hit);
}

#[test]
fn fifo_hits_do_not_refresh_order() {
    let mut cache = FifoCache::new(300);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    cache.get(3, 100, None);
    // In LRU this hit would save key 1; FIFO still evicts insertion-first.
    assert!(cache.get(1, 100, None).hit);
    cache.get(4, 100, None);

    assert!(!cache.get(1, 100, None).hit);
}

#[test]
fn mru_evicts_most_recently_used() {
    let mut cache = MruCache::new(300);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    cache.get(3, 100, None);
    assert!(cache.get(1, 100, None).hit);
    // Key 1 is now most recent and is the victim for 4.
    cache.get(4, 100, None);

    assert!(!cache.get(1, 100, None).hit);
}

#[test]
fn oversized_entries_are_not_admitted_and_evict_nothing() {
    let mut cache = LruCache::new(300);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    let before = cache.stats();

    assert!(!cache.get(9, 301, None).hit);
    let after = cache.stats();
    assert_eq!(after.used_bytes, before.used_bytes);
    assert_eq!(after.items, before.items);
    assert!(cache.get(1, 100, None).hit);
    assert!(cache.get(2, 100, None).hit);
}

#[test]
fn hit_rate_reflects_counters() {
    let mut cache = LruCache::new(300);
    assert_eq!(cache.stats().hit_rate, 0.0);
    cache.get(1, 100, None);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    cache.get(1, 100, None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
    assert!((stats.hit_rate - 0.5).abs() < 1e-12);
}
