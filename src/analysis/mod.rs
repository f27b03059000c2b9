mod metrics;

pub use metrics::{MetricsCollector, MetricsReport, RequestOutcome, TimeModel};
