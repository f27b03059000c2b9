use kvsim::cache::{Cache, LrukCache};

#[test]
fn victim_has_oldest_kth_access() {
    let mut cache = LrukCache::new(300, 2);
    cache.get(1, 100, None); // t=1
    cache.get(2, 100, None); // t=2
    cache.get(3, 100, None); // t=3
    assert!(cache.get(1, 100, None).hit); // t=4, key 1 history [1, 4]

    // Key 1's 2nd-most-recent access (t=1) is older than the single
    // accesses of 2 and 3, so key 1 goes first despite being hit twice.
    cache.get(4, 100, None); // t=5
    assert!(!cache.get(1, 100, None).hit); // t=6, readmitted; evicts key 2
    assert!(!cache.get(2, 100, None).hit); // t=7, readmitted; evicts key 3
    assert!(cache.get(4, 100, None).hit);
}

#[test]
fn history_survives_eviction() {
    let mut cache = LrukCache::new(200, 2);
    cache.get(1, 100, None); // t=1
    cache.get(1, 100, None); // t=2, history [1, 2]
    cache.get(2, 100, None); // t=3
    cache.get(3, 100, None); // t=4: evicts 1 (kth access t=1 is the low score)
    assert!(!cache.get(1, 100, None).hit); // t=5: history becomes [2, 5]

    // The retained t=2 access is again the oldest full-history score, so the
    // readmitted key 1 loses to 3 and 4 despite being freshly touched.
    cache.get(4, 100, None); // t=6
    assert!(!cache.get(1, 100, None).hit);
}

#[test]
fn puts_advance_the_access_clock() {
    let mut cache = LrukCache::new(200, 2);
    cache.get(1, 100, None); // t=1
    cache.put(9, 100, None); // t=2, admits 9 with history [2]
    // Admitting key 2 must evict 1 (score 1), not 9 (score 2).
    cache.get(2, 100, None); // t=3
    assert!(!cache.get(1, 100, None).hit);
    assert_eq!(cache.stats().extra["k"], 2);
}
