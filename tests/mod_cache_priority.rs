use kvsim::cache::{Cache, CacheMetadata, PriorityLruCache};

fn hint(priority: i64, pinned: bool) -> CacheMetadata {
    CacheMetadata { priority, pinned, ..CacheMetadata::default() }
}

#[test]
fn lowest_priority_bucket_is_evicted_first() {
    let mut cache = PriorityLruCache::new(300);
    cache.get(1, 100, Some(&hint(5, false)));
    cache.get(2, 100, Some(&hint(1, false)));
    cache.get(3, 100, Some(&hint(5, false)));
    // Admission of a high-priority key takes the low-priority victim.
    cache.get(4, 100, Some(&hint(9, false)));

    assert!(!cache.get(2, 100, Some(&hint(1, false))).hit);
    assert!(cache.get(3, 100, Some(&hint(5, false))).hit);
    assert!(cache.get(4, 100, Some(&hint(9, false))).hit);
}

#[test]
fn pinned_keys_are_passed_over() {
    let mut cache = PriorityLruCache::new(300);
    cache.get(1, 100, Some(&hint(0, true)));
    cache.get(2, 100, Some(&hint(0, false)));
    cache.get(3, 100, Some(&hint(0, false)));
    // Key 1 is the LRU but pinned; key 2 is the victim instead.
    cache.get(4, 100, Some(&hint(0, false)));

    assert!(cache.get(1, 100, Some(&hint(0, true))).hit);
    assert!(!cache.get(2, 100, Some(&hint(0, false))).hit);
}

#[test]
fn all_pinned_falls_back_to_lowest_priority_lru() {
    let mut cache = PriorityLruCache::new(200);
    cache.get(1, 100, Some(&hint(2, true)));
    cache.get(2, 100, Some(&hint(1, true)));
    // Pins are advisory under pressure: the lowest bucket's LRU goes anyway.
    cache.get(3, 100, Some(&hint(5, false)));

    let stats = cache.stats();
    assert_eq!(stats.items, 2);
    assert_eq!(stats.extra["pinned"], 1);
    assert!(cache.get(1, 100, Some(&hint(2, true))).hit);
    assert!(!cache.get(2, 100, Some(&hint(1, true))).hit);
}

#[test]
fn priority_is_fixed_at_admission() {
    let mut cache = PriorityLruCache::new(200);
    cache.get(1, 100, Some(&hint(1, false)));
    // Later hits with a different hint do not reclassify the key.
    assert!(cache.get(1, 100, Some(&hint(9, false))).hit);
    cache.get(2, 100, Some(&hint(5, false)));
    // Key 1 still sits in the priority-1 bucket and is the victim.
    cache.get(3, 100, Some(&hint(5, false)));

    assert!(!cache.get(1, 100, Some(&hint(1, false))).hit);
}
