#![forbid(unsafe_code)]

pub mod analysis;
pub mod cache;
pub mod config;
pub mod errors;
pub mod logger;
pub mod requests;
pub mod simulator;

use crate::analysis::MetricsReport;
use crate::cache::CacheStats;
use crate::config::{SimulatorConfig, WorkloadType};
use crate::errors::SimError;
use crate::simulator::Simulator;

/// Result of a full simulation run: the workload-level report plus the final
/// cache-level statistics snapshot.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub report: MetricsReport,
    pub cache_stats: CacheStats,
}

/// Replays the configured workload against the configured cache policy and
/// returns the finalized metrics.
///
/// # Errors
/// Returns an error for unknown policies, invalid capacity sizing, or an
/// unreadable/unsupported workload.
pub fn run(cfg: &SimulatorConfig) -> Result<SimulationOutcome, SimError> {
    let cfg = resolved_config(cfg)?;
    let cache = cache::build_cache(&cfg)?;
    let reqs = requests::generate(&cfg)?;
    log::info!(
        "replaying {} requests against policy={} capacity={}B",
        reqs.len(),
        cfg.policy,
        cfg.cache_capacity_bytes
    );

    let mut sim = Simulator::new(&cfg, cache);
    for req in &reqs {
        sim.handle_request(req);
    }
    let (report, cache_stats) = sim.finish();
    log::debug!("final cache stats: {cache_stats:?}");
    Ok(SimulationOutcome { report, cache_stats })
}

/// Applies trace-derived capacity sizing when `cache_capacity_fraction` is set:
/// capacity becomes a fraction of the trace's unique block footprint, and any
/// L1/L2 layer overrides are cleared.
fn resolved_config(cfg: &SimulatorConfig) -> Result<SimulatorConfig, SimError> {
    let mut cfg = cfg.clone();
    let Some(fraction) = cfg.trace_cache_capacity_fraction else {
        return Ok(cfg);
    };
    if cfg.workload_type != WorkloadType::Trace {
        return Ok(cfg);
    }
    let Some(path) = cfg.trace_path.clone() else {
        return Err(SimError::FractionNeedsTracePath);
    };
    if !matches!(cfg.policy.as_str(), "lru" | "lfu") {
        return Err(SimError::FractionPolicy(cfg.policy.clone()));
    }
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(SimError::FractionRange(fraction));
    }
    let unique_blocks = requests::count_unique_hash_ids(&path)?;
    if unique_blocks == 0 {
        return Err(SimError::EmptyTrace(path));
    }
    let capacity_blocks = (unique_blocks as f64 * fraction) as u64;
    if capacity_blocks == 0 {
        return Err(SimError::ZeroCapacity);
    }
    let block_bytes = cfg.block_size_tokens * cfg.model_kv_bytes_per_token;
    cfg.cache_capacity_bytes = capacity_blocks * block_bytes;
    cfg.l1_cache_capacity_bytes = None;
    cfg.l2_cache_capacity_bytes = None;
    Ok(cfg)
}
