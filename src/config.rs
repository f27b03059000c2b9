use crate::errors::SimError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the request stream comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadType {
    Synthetic,
    Trace,
}

impl WorkloadType {
    fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("trace") { Self::Trace } else { Self::Synthetic }
    }
}

/// Per-request sequence length sampling. `dist` selects the distribution
/// (fixed, uniform, normal, lognormal); unused fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SequenceLengthSpec {
    #[serde(default = "default_dist")]
    pub dist: String,
    #[serde(default)]
    pub value: Option<u64>,
    #[serde(default)]
    pub low: Option<u64>,
    #[serde(default)]
    pub high: Option<u64>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default = "default_min_value")]
    pub min_value: u64,
    #[serde(default = "default_max_value")]
    pub max_value: u64,
}

impl SequenceLengthSpec {
    #[must_use]
    pub fn fixed(value: u64) -> Self {
        Self { value: Some(value), ..Self::default() }
    }
}

impl Default for SequenceLengthSpec {
    fn default() -> Self {
        Self {
            dist: default_dist(),
            value: None,
            low: None,
            high: None,
            mean: None,
            std: None,
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }
}

/// Bandwidth and compute rates behind the TTFT estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeModelConfig {
    #[serde(default = "default_compute_tokens_per_ms")]
    pub compute_tokens_per_ms: f64,
    #[serde(default = "default_l1_bandwidth")]
    pub l1_bandwidth_bytes_per_ms: f64,
    #[serde(default = "default_l2_bandwidth")]
    pub l2_bandwidth_bytes_per_ms: f64,
    #[serde(default = "default_miss_bandwidth")]
    pub miss_bandwidth_bytes_per_ms: f64,
    #[serde(default)]
    pub hit_compute_fraction: f64,
}

impl Default for TimeModelConfig {
    fn default() -> Self {
        Self {
            compute_tokens_per_ms: default_compute_tokens_per_ms(),
            l1_bandwidth_bytes_per_ms: default_l1_bandwidth(),
            l2_bandwidth_bytes_per_ms: default_l2_bandwidth(),
            miss_bandwidth_bytes_per_ms: default_miss_bandwidth(),
            hit_compute_fraction: 0.0,
        }
    }
}

/// Fully resolved simulation parameters.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub seed: u64,
    pub num_requests: u64,
    pub num_sequences: u64,
    pub sequence_length: u64,
    pub sequence_length_dist: SequenceLengthSpec,
    pub model_kv_bytes_per_token: u64,
    pub cache_capacity_bytes: u64,
    pub l1_cache_capacity_bytes: Option<u64>,
    pub l2_cache_capacity_bytes: Option<u64>,
    pub policy: String,
    pub reuse_model: String,
    pub reuse_zipf_a: f64,
    pub workload_type: WorkloadType,
    pub trace_path: Option<PathBuf>,
    pub trace_cache_capacity_fraction: Option<f64>,
    pub block_size_tokens: u64,
    pub time_model: TimeModelConfig,
    pub cache_ttl_ms: i64,
    pub lru_k: usize,
    pub twoq_a1in_fraction: f64,
    pub twoq_a1out_fraction: f64,
    pub arc_p_init_fraction: f64,
    pub tenant_partition_count: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            num_requests: 0,
            num_sequences: 0,
            sequence_length: 0,
            sequence_length_dist: SequenceLengthSpec::default(),
            model_kv_bytes_per_token: 1,
            cache_capacity_bytes: 0,
            l1_cache_capacity_bytes: None,
            l2_cache_capacity_bytes: None,
            policy: "lru".to_string(),
            reuse_model: "zipf".to_string(),
            reuse_zipf_a: 1.2,
            workload_type: WorkloadType::Synthetic,
            trace_path: None,
            trace_cache_capacity_fraction: None,
            block_size_tokens: 512,
            time_model: TimeModelConfig::default(),
            cache_ttl_ms: 0,
            lru_k: 2,
            twoq_a1in_fraction: 0.25,
            twoq_a1out_fraction: 0.5,
            arc_p_init_fraction: 0.5,
            tenant_partition_count: 4,
        }
    }
}

impl SimulatorConfig {
    /// Loads a YAML config file. Relative trace paths resolve against the
    /// config file's directory.
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        let raw: RawConfig = serde_yaml::from_str(&text)?;
        Ok(raw.resolve(path.parent()))
    }

    /// Parses a YAML config from a string; relative trace paths are kept as-is.
    /// # Errors
    /// Returns an error if the text cannot be parsed.
    pub fn from_yaml_str(text: &str) -> Result<Self, SimError> {
        let raw: RawConfig = serde_yaml::from_str(text)?;
        Ok(raw.resolve(None))
    }
}

/// The on-disk layout. Workload settings are accepted both as a nested
/// `workload:` section and as flat top-level keys, the nested form winning.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_seed")]
    seed: u64,
    num_requests: u64,
    #[serde(default)]
    num_sequences: Option<u64>,
    #[serde(default)]
    sequence_length: u64,
    #[serde(default)]
    sequence_length_dist: Option<SequenceLengthSpec>,
    model_kv_bytes_per_token: u64,
    cache_capacity_bytes: u64,
    #[serde(default)]
    l1_cache_capacity_bytes: Option<u64>,
    #[serde(default)]
    l2_cache_capacity_bytes: Option<u64>,
    #[serde(default = "default_policy")]
    policy: String,
    #[serde(default = "default_reuse_model")]
    reuse_model: String,
    #[serde(default = "default_reuse_zipf_a")]
    reuse_zipf_a: f64,
    #[serde(default)]
    workload: Option<WorkloadSection>,
    #[serde(default)]
    workload_type: Option<String>,
    #[serde(default)]
    trace_path: Option<PathBuf>,
    #[serde(default)]
    trace_cache_capacity_fraction: Option<f64>,
    #[serde(default = "default_block_size_tokens")]
    block_size_tokens: u64,
    #[serde(default)]
    time_model: TimeModelConfig,
    #[serde(default)]
    cache_ttl_ms: i64,
    #[serde(default = "default_lru_k")]
    lru_k: usize,
    #[serde(default = "default_a1in_fraction")]
    twoq_a1in_fraction: f64,
    #[serde(default = "default_a1out_fraction")]
    twoq_a1out_fraction: f64,
    #[serde(default = "default_p_init_fraction")]
    arc_p_init_fraction: f64,
    #[serde(default = "default_partition_count")]
    tenant_partition_count: usize,
}

#[derive(Debug, Default, Deserialize)]
struct WorkloadSection {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    trace_path: Option<PathBuf>,
    #[serde(default)]
    cache_capacity_fraction: Option<f64>,
}

impl RawConfig {
    fn resolve(self, base_dir: Option<&Path>) -> SimulatorConfig {
        let workload = self.workload.unwrap_or_default();
        let workload_tag = workload
            .kind
            .or(self.workload_type)
            .unwrap_or_else(|| "synthetic".to_string());
        let trace_path = workload.trace_path.or(self.trace_path).map(|p| {
            match base_dir {
                Some(base) if p.is_relative() => base.join(p),
                _ => p,
            }
        });
        let fraction = workload.cache_capacity_fraction.or(self.trace_cache_capacity_fraction);
        let sequence_length_dist = self
            .sequence_length_dist
            .unwrap_or_else(|| SequenceLengthSpec::fixed(self.sequence_length));

        SimulatorConfig {
            seed: self.seed,
            num_requests: self.num_requests,
            num_sequences: self.num_sequences.unwrap_or(self.num_requests),
            sequence_length: self.sequence_length,
            sequence_length_dist,
            model_kv_bytes_per_token: self.model_kv_bytes_per_token,
            cache_capacity_bytes: self.cache_capacity_bytes,
            l1_cache_capacity_bytes: self.l1_cache_capacity_bytes,
            l2_cache_capacity_bytes: self.l2_cache_capacity_bytes,
            policy: self.policy,
            reuse_model: self.reuse_model,
            reuse_zipf_a: self.reuse_zipf_a,
            workload_type: WorkloadType::from_tag(&workload_tag),
            trace_path,
            trace_cache_capacity_fraction: fraction,
            block_size_tokens: self.block_size_tokens,
            time_model: self.time_model,
            cache_ttl_ms: self.cache_ttl_ms,
            lru_k: self.lru_k,
            twoq_a1in_fraction: self.twoq_a1in_fraction,
            twoq_a1out_fraction: self.twoq_a1out_fraction,
            arc_p_init_fraction: self.arc_p_init_fraction,
            tenant_partition_count: self.tenant_partition_count,
        }
    }
}

fn default_seed() -> u64 {
    1
}

fn default_dist() -> String {
    "fixed".to_string()
}

fn default_min_value() -> u64 {
    1
}

fn default_max_value() -> u64 {
    131_072
}

fn default_policy() -> String {
    "lru".to_string()
}

fn default_reuse_model() -> String {
    "zipf".to_string()
}

fn default_reuse_zipf_a() -> f64 {
    1.2
}

fn default_block_size_tokens() -> u64 {
    512
}

fn default_compute_tokens_per_ms() -> f64 {
    1000.0
}

fn default_l1_bandwidth() -> f64 {
    5e8
}

fn default_l2_bandwidth() -> f64 {
    2e8
}

fn default_miss_bandwidth() -> f64 {
    5e7
}

fn default_lru_k() -> usize {
    2
}

fn default_a1in_fraction() -> f64 {
    0.25
}

fn default_a1out_fraction() -> f64 {
    0.5
}

fn default_p_init_fraction() -> f64 {
    0.5
}

fn default_partition_count() -> usize {
    4
}
