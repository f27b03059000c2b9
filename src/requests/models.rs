/// One prefill request drawn from a workload.
///
/// Trace-block workloads carry an ordered, prefix-first `block_hashes` list;
/// synthetic workloads leave it empty and are replayed as a single
/// whole-sequence lookup keyed by `sequence_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub request_id: u64,
    pub sequence_id: u64,
    pub sequence_length: u64,
    pub request_type: String,
    pub timestamp_ms: Option<i64>,
    pub input_length: Option<u64>,
    pub output_length: Option<u64>,
    pub priority: i64,
    pub pinned: bool,
    pub tenant_id: Option<String>,
    pub block_hashes: Vec<u64>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            request_id: 0,
            sequence_id: 0,
            sequence_length: 0,
            request_type: "prefill".to_string(),
            timestamp_ms: None,
            input_length: None,
            output_length: None,
            priority: 0,
            pinned: false,
            tenant_id: None,
            block_hashes: Vec::new(),
        }
    }
}

impl Request {
    /// The authoritative token count: `input_length` when present and
    /// positive, else `sequence_length`.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        match self.input_length {
            Some(tokens) if tokens > 0 => tokens,
            _ => self.sequence_length,
        }
    }
}
