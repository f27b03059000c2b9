use crate::cache::interfaces::Cache;
use crate::cache::{
    ArcCache, ClockCache, ClockProCache, FifoCache, HierarchicalLruCache, LfuCache, LruCache,
    LrukCache, MruCache, PartitionedLruCache, PriorityLruCache, TtlCache, TwoQCache,
};
use crate::config::SimulatorConfig;
use crate::errors::SimError;

/// Builds the cache selected by `cfg.policy`.
/// # Errors
/// Returns an error for an unrecognized policy tag, or for
/// `hierarchical_lru` without both layer capacities.
pub fn build_cache(cfg: &SimulatorConfig) -> Result<Box<dyn Cache>, SimError> {
    let capacity = cfg.cache_capacity_bytes;
    let cache: Box<dyn Cache> = match cfg.policy.as_str() {
        "lru" => Box::new(LruCache::new(capacity)),
        "lfu" => Box::new(LfuCache::new(capacity)),
        "fifo" => Box::new(FifoCache::new(capacity)),
        "mru" => Box::new(MruCache::new(capacity)),
        "ttl" => Box::new(TtlCache::new(capacity, cfg.cache_ttl_ms)),
        "2q" | "twoq" => {
            Box::new(TwoQCache::new(capacity, cfg.twoq_a1in_fraction, cfg.twoq_a1out_fraction))
        }
        "arc" => Box::new(ArcCache::new(capacity, cfg.arc_p_init_fraction)),
        "lru_k" | "lruk" => Box::new(LrukCache::new(capacity, cfg.lru_k)),
        "clock" => Box::new(ClockCache::new(capacity)),
        "clock_pro" | "clockpro" => Box::new(ClockProCache::new(capacity)),
        "priority_lru" => Box::new(PriorityLruCache::new(capacity)),
        "tenant_lru" => Box::new(PartitionedLruCache::new(capacity, cfg.tenant_partition_count)),
        "hierarchical_lru" => {
            let (Some(l1), Some(l2)) = (cfg.l1_cache_capacity_bytes, cfg.l2_cache_capacity_bytes)
            else {
                return Err(SimError::MissingLayerCapacity);
            };
            Box::new(HierarchicalLruCache::new(l1, l2))
        }
        other => return Err(SimError::UnknownPolicy(other.to_string())),
    };
    Ok(cache)
}
