//! Agent caching
//!
//! Agents are stored in fixed-capacity LRU caches keyed by the settings
//! that decide pool identity. The selector owns two caches, one for proxy
//! agents and one for direct agents.

pub mod agent_cache;
pub mod cache_key;
pub mod cache_stats;

pub use agent_cache::{AgentCache, DEFAULT_CAPACITY};
pub use cache_key::CacheKey;
pub use cache_stats::{CacheStats, CacheStatsSnapshot};
