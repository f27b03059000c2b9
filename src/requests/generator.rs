use crate::config::{SequenceLengthSpec, SimulatorConfig, WorkloadType};
use crate::errors::SimError;
use crate::requests::models::Request;
use crate::requests::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal, Zipf};

/// Produces the request stream for a run: either a recorded trace or a
/// seeded synthetic workload. The same config always yields the same stream.
/// # Errors
/// Returns an error for a missing/unreadable trace or invalid sampling
/// parameters.
pub fn generate(cfg: &SimulatorConfig) -> Result<Vec<Request>, SimError> {
    match cfg.workload_type {
        WorkloadType::Trace => {
            let path = cfg.trace_path.as_ref().ok_or(SimError::MissingTracePath)?;
            trace::read_trace(path)
        }
        WorkloadType::Synthetic => synthetic(cfg),
    }
}

fn synthetic(cfg: &SimulatorConfig) -> Result<Vec<Request>, SimError> {
    if cfg.num_requests > 0 && cfg.num_sequences == 0 {
        return Err(SimError::Workload("num_sequences must be positive".to_string()));
    }
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let pool = build_reuse_pool(cfg, &mut rng)?;
    let mut requests = Vec::with_capacity(cfg.num_requests as usize);
    for i in 0..cfg.num_requests {
        let sequence_id = pool[rng.random_range(0..pool.len())];
        let sequence_length =
            sample_sequence_length(&cfg.sequence_length_dist, &mut rng, cfg.sequence_length)?;
        requests.push(Request {
            request_id: i,
            sequence_id,
            sequence_length,
            ..Request::default()
        });
    }
    Ok(requests)
}

/// Sequence ids candidate pool. The uniform model lists each id once; the
/// Zipf model draws ids rank-skewed so smaller ids are reused more often.
fn build_reuse_pool(cfg: &SimulatorConfig, rng: &mut StdRng) -> Result<Vec<u64>, SimError> {
    if cfg.num_sequences == 0 {
        return Ok(Vec::new());
    }
    if cfg.reuse_model == "uniform" {
        return Ok((0..cfg.num_sequences).collect());
    }
    let zipf = Zipf::new(cfg.num_sequences as f64, cfg.reuse_zipf_a)
        .map_err(|e| SimError::Workload(format!("zipf(a={}): {e}", cfg.reuse_zipf_a)))?;
    Ok((0..cfg.num_sequences)
        .map(|_| {
            let rank = zipf.sample(rng) as u64;
            rank.clamp(1, cfg.num_sequences) - 1
        })
        .collect())
}

fn sample_sequence_length(
    spec: &SequenceLengthSpec,
    rng: &mut StdRng,
    fallback_length: u64,
) -> Result<u64, SimError> {
    let sampled = match spec.dist.as_str() {
        "fixed" => return Ok(or_u64(spec.value, fallback_length)),
        "uniform" => {
            let low = or_u64(spec.low, 1);
            let high = or_u64(spec.high, (low + 1).max(fallback_length)).max(low);
            return Ok(rng.random_range(low..=high));
        }
        "normal" => {
            let mean = or_f64(spec.mean, fallback_length as f64);
            let std = or_f64(spec.std, (mean * 0.1).max(1.0));
            let normal = Normal::new(mean, std)
                .map_err(|e| SimError::Workload(format!("normal({mean}, {std}): {e}")))?;
            normal.sample(rng)
        }
        "lognormal" => {
            let mean = or_f64(spec.mean, (fallback_length as f64).ln().max(1.0));
            let std = or_f64(spec.std, 0.5);
            let lognormal = LogNormal::new(mean, std)
                .map_err(|e| SimError::Workload(format!("lognormal({mean}, {std}): {e}")))?;
            lognormal.sample(rng)
        }
        other => return Err(SimError::UnknownDistribution(other.to_string())),
    };
    let clamped = (sampled as i64).clamp(spec.min_value as i64, spec.max_value as i64);
    Ok(clamped.max(0) as u64)
}

fn or_u64(value: Option<u64>, fallback: u64) -> u64 {
    match value {
        Some(v) if v > 0 => v,
        _ => fallback,
    }
}

fn or_f64(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 => v,
        _ => fallback,
    }
}
