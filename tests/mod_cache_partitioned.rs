use kvsim::cache::{Cache, CacheMetadata, PartitionedLruCache};

fn tenant(id: &str) -> CacheMetadata {
    CacheMetadata { tenant_id: Some(id.to_string()), ..CacheMetadata::default() }
}

#[test]
fn null_tenant_shares_partition_zero() {
    // Four partitions of 100 bytes each; anonymous requests compete for the
    // first one only.
    let mut cache = PartitionedLruCache::new(400, 4);
    cache.get(1, 100, None);
    cache.get(2, 100, None);

    assert!(!cache.get(1, 100, None).hit);
    let stats = cache.stats();
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.extra["partitions"], 4);
}

#[test]
fn tenants_map_to_stable_partitions() {
    let mut cache = PartitionedLruCache::new(400, 4);
    assert!(!cache.get(1, 50, Some(&tenant("acme"))).hit);
    assert!(cache.get(1, 50, Some(&tenant("acme"))).hit);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.used_bytes, 50);
}

#[test]
fn partition_count_has_a_floor_of_one() {
    let mut cache = PartitionedLruCache::new(300, 0);
    cache.get(1, 100, None);
    cache.get(2, 100, None);
    cache.get(3, 100, None);
    // A single partition owns the whole capacity.
    let stats = cache.stats();
    assert_eq!(stats.extra["partitions"], 1);
    assert_eq!(stats.used_bytes, 300);
}

#[test]
fn hits_and_misses_aggregate_across_partitions() {
    let mut cache = PartitionedLruCache::new(800, 2);
    cache.get(1, 50, Some(&tenant("a")));
    cache.get(1, 50, Some(&tenant("a")));
    cache.get(2, 50, Some(&tenant("b")));
    cache.get(2, 50, Some(&tenant("b")));

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.items, 2);
}
