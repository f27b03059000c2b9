use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("CSV trace error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown cache policy: {0}")]
    UnknownPolicy(String),

    #[error("hierarchical_lru requires l1_cache_capacity_bytes and l2_cache_capacity_bytes")]
    MissingLayerCapacity,

    #[error("unknown sequence length distribution: {0}")]
    UnknownDistribution(String),

    #[error("invalid workload parameters: {0}")]
    Workload(String),

    #[error("trace workload requires trace_path in config")]
    MissingTracePath,

    #[error("unsupported trace format: {0}")]
    UnsupportedTraceFormat(String),

    #[error("invalid trace record at line {line}: {reason}")]
    TraceRecord { line: usize, reason: String },

    #[error("cache_capacity_fraction requires trace_path")]
    FractionNeedsTracePath,

    #[error("cache_capacity_fraction requires a JSONL trace: {}", .0.display())]
    FractionNeedsJsonl(PathBuf),

    #[error("cache_capacity_fraction supports policy=lru or policy=lfu, got {0}")]
    FractionPolicy(String),

    #[error("cache_capacity_fraction must be in the (0, 1] range, got {0}")]
    FractionRange(f64),

    #[error("no hash_ids found in trace: {}", .0.display())]
    EmptyTrace(PathBuf),

    #[error("computed cache capacity is zero; check cache_capacity_fraction")]
    ZeroCapacity,
}
