use crate::analysis::{MetricsCollector, MetricsReport, RequestOutcome, TimeModel};
use crate::cache::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
use crate::config::SimulatorConfig;
use crate::requests::Request;

/// Replays requests against a cache, one at a time.
///
/// Trace-block requests walk their hash list in order under the prefix-lock
/// rule: the first missing block ends hit crediting for the request, and
/// every block from there on is written back via `put`. Requests without
/// block hashes fall back to a single whole-sequence lookup keyed by
/// `sequence_id`.
pub struct Simulator<'cfg> {
    cfg: &'cfg SimulatorConfig,
    cache: Box<dyn Cache>,
    metrics: MetricsCollector,
    time_model: TimeModel,
}

impl<'cfg> Simulator<'cfg> {
    #[must_use]
    pub fn new(cfg: &'cfg SimulatorConfig, cache: Box<dyn Cache>) -> Self {
        Self {
            cfg,
            cache,
            metrics: MetricsCollector::new(),
            time_model: TimeModel::new(cfg.time_model.clone()),
        }
    }

    pub fn handle_request(&mut self, req: &Request) {
        let metadata = CacheMetadata {
            timestamp_ms: req.timestamp_ms,
            priority: req.priority,
            pinned: req.pinned,
            tenant_id: req.tenant_id.clone(),
        };
        if req.block_hashes.is_empty() {
            self.replay_whole_sequence(req, &metadata);
        } else {
            self.replay_blocks(req, &metadata);
        }
    }

    /// Finalizes the run, yielding the report and the cache's own stats.
    #[must_use]
    pub fn finish(self) -> (MetricsReport, CacheStats) {
        (self.metrics.finalize(), self.cache.stats())
    }

    fn replay_blocks(&mut self, req: &Request, metadata: &CacheMetadata) {
        let total_tokens = req.total_tokens();
        let block_tokens =
            split_tokens(total_tokens, req.block_hashes.len(), self.cfg.block_size_tokens);

        let mut prefix_hits = 0u64;
        let mut hit_tokens = 0u64;
        let mut l1_bytes = 0u64;
        let mut l2_bytes = 0u64;
        let mut miss_bytes = 0u64;
        let mut read_bytes = 0u64;
        let mut write_bytes = 0u64;
        let mut prefix_active = true;

        for (&block_id, &tokens) in req.block_hashes.iter().zip(block_tokens.iter()) {
            let kv_bytes = tokens * self.cfg.model_kv_bytes_per_token;
            if prefix_active {
                let result = self.cache.get(block_id, kv_bytes, Some(metadata));
                if result.hit {
                    prefix_hits += 1;
                    hit_tokens += tokens;
                    read_bytes += kv_bytes;
                    if result.level == CacheLevel::L2 {
                        l2_bytes += kv_bytes;
                    } else {
                        l1_bytes += kv_bytes;
                    }
                    continue;
                }
                prefix_active = false;
            }
            // Past the first miss the rest of the request is a miss: account
            // the KV write and deposit the block for future requests.
            miss_bytes += kv_bytes;
            write_bytes += kv_bytes;
            self.cache.put(block_id, kv_bytes, Some(metadata));
        }

        let kv_bytes_total = l1_bytes + l2_bytes + miss_bytes;
        let ttft_ms =
            self.time_model.estimate_ttft_ms(total_tokens, hit_tokens, l1_bytes, l2_bytes, miss_bytes);
        let block_total = req.block_hashes.len() as u64;
        let full_hit = prefix_hits == block_total && block_total > 0;
        let lookup = if full_hit {
            let level = if l2_bytes > 0 { CacheLevel::L2 } else { CacheLevel::L1 };
            CacheLookup::hit(level)
        } else {
            CacheLookup::miss()
        };
        self.metrics.record_request(
            req,
            &RequestOutcome {
                lookup,
                kv_bytes: kv_bytes_total,
                ttft_ms,
                read_bytes,
                write_bytes,
                block_hits: prefix_hits,
                block_total,
            },
        );
    }

    fn replay_whole_sequence(&mut self, req: &Request, metadata: &CacheMetadata) {
        let kv_bytes = req.sequence_length * self.cfg.model_kv_bytes_per_token;
        let result = self.cache.get(req.sequence_id, kv_bytes, Some(metadata));
        let l1_bytes = if result.hit && result.level != CacheLevel::L2 { kv_bytes } else { 0 };
        let l2_bytes = if result.hit && result.level == CacheLevel::L2 { kv_bytes } else { 0 };
        let miss_bytes = if result.hit { 0 } else { kv_bytes };
        let hit_tokens = if result.hit { req.sequence_length } else { 0 };
        let ttft_ms = self.time_model.estimate_ttft_ms(
            req.sequence_length,
            hit_tokens,
            l1_bytes,
            l2_bytes,
            miss_bytes,
        );
        self.metrics.record_request(
            req,
            &RequestOutcome {
                lookup: result,
                kv_bytes,
                ttft_ms,
                read_bytes: if result.hit { kv_bytes } else { 0 },
                write_bytes: if result.hit { 0 } else { kv_bytes },
                block_hits: 0,
                block_total: 0,
            },
        );
    }
}

/// Distributes a request's tokens across its blocks. Every block except the
/// last gets at most `block_size` tokens; the last absorbs the remainder.
/// Blocks never get fewer than one token, so a short request still charges
/// every listed block at least a token of KV traffic.
#[must_use]
pub fn split_tokens(total_tokens: u64, num_blocks: usize, block_size: u64) -> Vec<u64> {
    if num_blocks == 0 {
        return Vec::new();
    }
    if total_tokens == 0 {
        return vec![block_size; num_blocks];
    }
    let mut tokens_left = total_tokens;
    let mut sizes = Vec::with_capacity(num_blocks);
    for i in 0..num_blocks {
        if i == num_blocks - 1 {
            sizes.push(tokens_left.max(1));
        } else {
            sizes.push(block_size.min(tokens_left.max(1)));
        }
        tokens_left = tokens_left.saturating_sub(block_size);
    }
    sizes
}
