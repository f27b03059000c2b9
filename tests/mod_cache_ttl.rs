use kvsim::cache::{Cache, CacheMetadata, TtlCache};

fn at(timestamp_ms: i64) -> CacheMetadata {
    CacheMetadata { timestamp_ms: Some(timestamp_ms), ..CacheMetadata::default() }
}

#[test]
fn entries_expire_by_trace_timestamp() {
    let mut cache = TtlCache::new(1000, 100);
    assert!(!cache.get(1, 100, Some(&at(0))).hit);
    assert!(cache.get(1, 100, Some(&at(50))).hit);
    // At t=200 the entry admitted around t=0 is past its deadline.
    assert!(!cache.get(1, 100, Some(&at(200))).hit);
}

#[test]
fn logical_clock_ticks_when_timestamps_are_absent() {
    let mut cache = TtlCache::new(1000, 3);
    assert!(!cache.get(1, 100, None).hit); // now=1, expires at 4
    assert!(cache.get(1, 100, None).hit); // now=2
    assert!(cache.get(1, 100, None).hit); // now=3
    assert!(!cache.get(1, 100, None).hit); // now=4, expired
}

#[test]
fn expired_entries_are_purged_before_admission() {
    let mut cache = TtlCache::new(300, 10);
    cache.get(1, 100, Some(&at(1000)));
    cache.get(2, 100, Some(&at(1001)));
    assert_eq!(cache.stats().items, 2);

    // Both are stale by t=2000; admission reclaims them without pressure.
    cache.get(3, 100, Some(&at(2000)));
    let stats = cache.stats();
    assert_eq!(stats.items, 1);
    assert_eq!(stats.used_bytes, 100);
}

#[test]
fn zero_ttl_disables_expiry_and_keeps_fifo_order() {
    let mut cache = TtlCache::new(300, 0);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    cache.get(3, 100, None);
    // Entries never expire without a TTL.
    assert!(cache.get(1, 100, None).hit);
    // The hit did not refresh key 1, so it is still first out.
    cache.get(4, 100, None);
    assert!(!cache.get(1, 100, None).hit);
}

#[test]
fn eviction_under_pressure_removes_oldest() {
    let mut cache = TtlCache::new(200, 1_000_000);
    cache.get(1, 100, Some(&at(10)));
    cache.get(2, 100, Some(&at(20)));
    cache.get(3, 100, Some(&at(30)));
    assert!(!cache.get(1, 100, Some(&at(40))).hit);
    assert!(cache.get(3, 100, Some(&at(50))).hit);
}
