use kvsim::cache::{Cache, LruCache};
use kvsim::config::SimulatorConfig;
use kvsim::requests::Request;
use kvsim::simulator::{Simulator, split_tokens};

fn block_config() -> SimulatorConfig {
    SimulatorConfig {
        cache_capacity_bytes: 8192,
        model_kv_bytes_per_token: 2,
        block_size_tokens: 512,
        ..SimulatorConfig::default()
    }
}

fn block_request(blocks: Vec<u64>, input_tokens: u64) -> Request {
    Request {
        sequence_id: blocks.first().copied().unwrap_or(0),
        sequence_length: input_tokens,
        input_length: Some(input_tokens),
        block_hashes: blocks,
        ..Request::default()
    }
}

#[test]
fn prefix_lock_stops_crediting_after_first_miss() {
    let cfg = block_config();
    let mut cache: Box<dyn Cache> = Box::new(LruCache::new(cfg.cache_capacity_bytes));
    // Blocks A and B are already resident; C and D are fresh.
    cache.put(11, 1024, None);
    cache.put(12, 1024, None);

    let mut sim = Simulator::new(&cfg, cache);
    sim.handle_request(&block_request(vec![11, 12, 13, 14], 4 * 512));
    let (report, stats) = sim.finish();

    assert_eq!(report.prefix_block_hits, 2);
    assert_eq!(report.prefix_block_total, 4);
    assert_eq!(report.bytes_read, 2 * 512 * 2);
    assert_eq!(report.bytes_written, 2 * 512 * 2);
    assert_eq!(report.bytes_requested, 4 * 512 * 2);
    assert_eq!(report.request_full_prefix_hits, 0);
    assert_eq!(report.request_full_prefix_misses, 1);
    assert_eq!(report.bytes_cached, 0);

    // Missed blocks were deposited for future requests without counting as
    // cache lookups.
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);

    // TTFT: 1024 miss tokens of compute plus tiered byte loads.
    let expected_ttft = 1024.0 / 1000.0 + 2048.0 / 5e8 + 2048.0 / 5e7;
    assert!((report.ttft_mean_ms - expected_ttft).abs() < 1e-9);
}

#[test]
fn cached_blocks_behind_a_miss_are_not_credited() {
    let cfg = block_config();
    let mut cache: Box<dyn Cache> = Box::new(LruCache::new(cfg.cache_capacity_bytes));
    // D is resident but sits behind the missing A in the walk.
    cache.put(14, 1024, None);

    let mut sim = Simulator::new(&cfg, cache);
    sim.handle_request(&block_request(vec![11, 12, 13, 14], 4 * 512));
    let (report, _) = sim.finish();

    assert_eq!(report.prefix_block_hits, 0);
    assert_eq!(report.bytes_read, 0);
    assert_eq!(report.bytes_written, 4 * 512 * 2);
}

#[test]
fn repeated_request_becomes_a_full_prefix_hit() {
    let cfg = block_config();
    let cache: Box<dyn Cache> = Box::new(LruCache::new(cfg.cache_capacity_bytes));
    let mut sim = Simulator::new(&cfg, cache);

    sim.handle_request(&block_request(vec![11, 12, 13, 14], 4 * 512));
    sim.handle_request(&block_request(vec![11, 12, 13, 14], 4 * 512));
    let (report, _) = sim.finish();

    assert_eq!(report.total_requests, 2);
    assert_eq!(report.request_full_prefix_hits, 1);
    assert_eq!(report.prefix_block_hits, 4);
    assert_eq!(report.prefix_block_total, 8);
    assert!((report.prefix_block_hit_rate - 0.5).abs() < 1e-12);
    assert_eq!(report.bytes_cached, 4 * 512 * 2);
}

#[test]
fn requests_without_blocks_use_a_single_sequence_lookup() {
    let cfg = SimulatorConfig {
        cache_capacity_bytes: 1000,
        model_kv_bytes_per_token: 2,
        ..SimulatorConfig::default()
    };
    let cache: Box<dyn Cache> = Box::new(LruCache::new(cfg.cache_capacity_bytes));
    let mut sim = Simulator::new(&cfg, cache);

    let req = Request { sequence_id: 42, sequence_length: 100, ..Request::default() };
    sim.handle_request(&req);
    sim.handle_request(&Request { request_id: 1, ..req.clone() });
    let (report, _) = sim.finish();

    assert_eq!(report.total_requests, 2);
    assert_eq!(report.request_full_prefix_hits, 1);
    assert_eq!(report.bytes_requested, 400);
    assert_eq!(report.bytes_written, 200);
    assert_eq!(report.bytes_read, 200);
    assert_eq!(report.bytes_cached, 200);
    // Single-key mode reports no block counters.
    assert_eq!(report.prefix_block_total, 0);
}

#[test]
fn token_split_caps_blocks_and_gives_the_tail_the_remainder() {
    assert_eq!(split_tokens(2048, 4, 512), vec![512, 512, 512, 512]);
    assert_eq!(split_tokens(1000, 4, 512), vec![512, 488, 1, 1]);
    assert_eq!(split_tokens(3000, 4, 512), vec![512, 512, 512, 1464]);
    assert_eq!(split_tokens(0, 3, 512), vec![512, 512, 512]);
    assert_eq!(split_tokens(100, 0, 512), Vec::<u64>::new());
    // Every block is charged at least one token.
    assert_eq!(split_tokens(5, 3, 512), vec![5, 1, 1]);
}
