use crate::cache::CacheLookup;
use crate::config::TimeModelConfig;
use crate::requests::Request;
use serde::Serialize;
use std::fmt::Write as _;

/// Converts per-request byte ledgers and token counts into TTFT
/// milliseconds: compute for the tokens that must be prefilled (plus a
/// residual fraction for cached tokens) and byte-load time from the tiered
/// bandwidths.
pub struct TimeModel {
    cfg: TimeModelConfig,
}

impl TimeModel {
    #[must_use]
    pub fn new(cfg: TimeModelConfig) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub fn estimate_ttft_ms(
        &self,
        total_tokens: u64,
        hit_tokens: u64,
        l1_bytes: u64,
        l2_bytes: u64,
        miss_bytes: u64,
    ) -> f64 {
        let miss_tokens = total_tokens.saturating_sub(hit_tokens) as f64;
        let compute_ms = miss_tokens / self.cfg.compute_tokens_per_ms
            + (hit_tokens as f64 / self.cfg.compute_tokens_per_ms) * self.cfg.hit_compute_fraction;
        let load_ms = l1_bytes as f64 / self.cfg.l1_bandwidth_bytes_per_ms
            + l2_bytes as f64 / self.cfg.l2_bandwidth_bytes_per_ms
            + miss_bytes as f64 / self.cfg.miss_bandwidth_bytes_per_ms;
        compute_ms + load_ms
    }
}

/// What the engine observed for one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOutcome {
    pub lookup: CacheLookup,
    pub kv_bytes: u64,
    pub ttft_ms: f64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub block_hits: u64,
    pub block_total: u64,
}

/// Accumulates per-request counters and TTFT samples across a run.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    total_requests: u64,
    request_full_prefix_hits: u64,
    request_full_prefix_misses: u64,
    bytes_requested: u64,
    bytes_cached: u64,
    bytes_read: u64,
    bytes_written: u64,
    prefix_block_hits: u64,
    prefix_block_total: u64,
    ttft_ms: Vec<f64>,
    total_tokens: u64,
    timestamped_tokens: u64,
    first_timestamp_ms: Option<i64>,
    last_timestamp_ms: Option<i64>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&mut self, req: &Request, outcome: &RequestOutcome) {
        self.total_requests += 1;
        self.bytes_requested += outcome.kv_bytes;
        self.bytes_read += outcome.read_bytes;
        self.bytes_written += outcome.write_bytes;
        self.ttft_ms.push(outcome.ttft_ms);
        self.total_tokens += req.sequence_length;
        if let Some(ts) = req.timestamp_ms
            && ts > 0
        {
            if self.first_timestamp_ms.is_none() {
                self.first_timestamp_ms = Some(ts);
            }
            self.last_timestamp_ms = Some(ts);
            self.timestamped_tokens += req.total_tokens();
        }
        self.prefix_block_hits += outcome.block_hits;
        self.prefix_block_total += outcome.block_total;
        if outcome.lookup.hit {
            self.request_full_prefix_hits += 1;
            self.bytes_cached += outcome.kv_bytes;
        } else {
            self.request_full_prefix_misses += 1;
        }
    }

    #[must_use]
    pub fn finalize(&self) -> MetricsReport {
        let hit_rate = if self.total_requests > 0 {
            self.request_full_prefix_hits as f64 / self.total_requests as f64
        } else {
            0.0
        };
        let block_hit_rate = if self.prefix_block_total > 0 {
            self.prefix_block_hits as f64 / self.prefix_block_total as f64
        } else {
            0.0
        };
        let mut sorted = self.ttft_ms.clone();
        sorted.sort_by(f64::total_cmp);
        let ttft_mean_ms = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        };
        let ttft_p95_ms = percentile(&sorted, 95.0);
        let ttft_p99_ms = percentile(&sorted, 99.0);

        // Prefer the trace's own wall clock; fall back to synthesized time
        // from the TTFT samples.
        let (throughput_tokens_per_s, throughput_source) = match (
            self.first_timestamp_ms,
            self.last_timestamp_ms,
        ) {
            (Some(first), Some(last)) if last > first && self.timestamped_tokens > 0 => {
                let total_time_s = (last - first) as f64 / 1000.0;
                (self.timestamped_tokens as f64 / total_time_s, "timestamp")
            }
            _ => {
                let total_time_s = self.ttft_ms.iter().sum::<f64>() / 1000.0;
                let throughput = if total_time_s > 0.0 {
                    self.total_tokens as f64 / total_time_s
                } else {
                    0.0
                };
                (throughput, "ttft")
            }
        };

        MetricsReport {
            total_requests: self.total_requests,
            request_full_prefix_hits: self.request_full_prefix_hits,
            request_full_prefix_misses: self.request_full_prefix_misses,
            request_full_prefix_hit_rate: hit_rate,
            bytes_requested: self.bytes_requested,
            bytes_cached: self.bytes_cached,
            bytes_read: self.bytes_read,
            bytes_written: self.bytes_written,
            prefix_block_hits: self.prefix_block_hits,
            prefix_block_total: self.prefix_block_total,
            prefix_block_hit_rate: block_hit_rate,
            ttft_mean_ms,
            ttft_p95_ms,
            ttft_p99_ms,
            throughput_tokens_per_s,
            throughput_source: throughput_source.to_string(),
        }
    }
}

/// Linear-interpolated percentile over pre-sorted samples.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Finalized run statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub total_requests: u64,
    pub request_full_prefix_hits: u64,
    pub request_full_prefix_misses: u64,
    pub request_full_prefix_hit_rate: f64,
    pub bytes_requested: u64,
    pub bytes_cached: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub prefix_block_hits: u64,
    pub prefix_block_total: u64,
    pub prefix_block_hit_rate: f64,
    pub ttft_mean_ms: f64,
    pub ttft_p95_ms: f64,
    pub ttft_p99_ms: f64,
    pub throughput_tokens_per_s: f64,
    pub throughput_source: String,
}

impl MetricsReport {
    /// Fixed-field text rendering.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "KV Cache Simulation Report");
        let _ = writeln!(out, "Total requests: {}", self.total_requests);
        let _ = writeln!(out, "Request full-prefix hits: {}", self.request_full_prefix_hits);
        let _ = writeln!(out, "Request full-prefix misses: {}", self.request_full_prefix_misses);
        let _ = writeln!(
            out,
            "Request full-prefix hit rate: {:.4}",
            self.request_full_prefix_hit_rate
        );
        let _ = writeln!(out, "Bytes requested: {}", self.bytes_requested);
        let _ = writeln!(out, "Bytes cached: {}", self.bytes_cached);
        let _ = writeln!(out, "Bytes read: {}", self.bytes_read);
        let _ = writeln!(out, "Bytes written: {}", self.bytes_written);
        let _ = writeln!(out, "Prefix block hits: {}", self.prefix_block_hits);
        let _ = writeln!(out, "Prefix block total: {}", self.prefix_block_total);
        let _ = writeln!(out, "Prefix block hit rate: {:.4}", self.prefix_block_hit_rate);
        let _ = writeln!(out, "TTFT mean (ms): {:.2}", self.ttft_mean_ms);
        let _ = writeln!(out, "TTFT p95 (ms): {:.2}", self.ttft_p95_ms);
        let _ = writeln!(out, "TTFT p99 (ms): {:.2}", self.ttft_p99_ms);
        let _ = writeln!(
            out,
            "Throughput (tokens/s): {:.2} ({})",
            self.throughput_tokens_per_s, self.throughput_source
        );
        out
    }
}
