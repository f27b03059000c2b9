mod arc;
mod clock;
mod clockpro;
mod factory;
mod hierarchical;
mod interfaces;
mod lfu;
mod lru;
mod lruk;
mod ordered;
mod partitioned;
mod priority;
mod ttl;
mod twoq;

pub use arc::ArcCache;
pub use clock::ClockCache;
pub use clockpro::ClockProCache;
pub use factory::build_cache;
pub use hierarchical::HierarchicalLruCache;
pub use interfaces::{Cache, CacheLevel, CacheLookup, CacheMetadata, CacheStats};
pub use lfu::LfuCache;
pub use self::lru::{FifoCache, LruCache, MruCache};
pub use lruk::LrukCache;
pub use partitioned::PartitionedLruCache;
pub use priority::PriorityLruCache;
pub use ttl::TtlCache;
pub use twoq::TwoQCache;
