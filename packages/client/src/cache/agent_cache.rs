//! Fixed-capacity LRU store of shared agents
//!
//! Lookup, build, insert, promotion and eviction all happen under one lock,
//! so concurrent callers with the same key never build two agents.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::cache_key::CacheKey;
use super::cache_stats::{CacheStats, CacheStatsSnapshot};
use crate::agent::Agent;

/// Number of agents each cache holds by default.
pub const DEFAULT_CAPACITY: usize = 50;

/// LRU map from [`CacheKey`] to a shared agent.
pub struct AgentCache<A = Agent> {
    entries: Mutex<LruCache<CacheKey, Arc<A>>>,
    stats: CacheStats,
}

impl<A> AgentCache<A> {
    /// Cache holding [`DEFAULT_CAPACITY`] agents.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }

    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::new(),
        }
    }

    /// Return the agent stored under `key`, building and storing it on a
    /// miss. A hit marks the entry most recently used.
    pub fn get_or_create<F>(&self, key: CacheKey, build: F) -> Arc<A>
    where
        F: FnOnce() -> A,
    {
        let mut entries = self.entries.lock();
        if let Some(agent) = self.lookup(&mut entries, &key) {
            return agent;
        }
        self.insert(&mut entries, key, build())
    }

    /// Like [`get_or_create`](Self::get_or_create), but `build` may decline.
    /// A declined build stores nothing, so the next call with the same key
    /// runs `build` again.
    pub fn get_or_try_create<F>(&self, key: CacheKey, build: F) -> Option<Arc<A>>
    where
        F: FnOnce() -> Option<A>,
    {
        let mut entries = self.entries.lock();
        if let Some(agent) = self.lookup(&mut entries, &key) {
            return Some(agent);
        }
        let agent = build()?;
        Some(self.insert(&mut entries, key, agent))
    }

    /// Read without touching recency or counters.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<A>> {
        self.entries.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    fn lookup(&self, entries: &mut LruCache<CacheKey, Arc<A>>, key: &CacheKey) -> Option<Arc<A>> {
        let agent = entries.get(key).cloned();
        if agent.is_some() {
            self.stats.record_hit();
            tracing::trace!(target: "mesh_agent::cache", "Agent cache hit: {}", key);
        }
        agent
    }

    fn insert(&self, entries: &mut LruCache<CacheKey, Arc<A>>, key: CacheKey, agent: A) -> Arc<A> {
        self.stats.record_miss();
        tracing::debug!(target: "mesh_agent::cache", "Agent cache miss, stored new agent: {}", key);

        let agent = Arc::new(agent);
        if let Some((evicted, _)) = entries.push(key, Arc::clone(&agent)) {
            self.stats.record_eviction();
            tracing::debug!(target: "mesh_agent::cache", "Evicted least recently used agent: {}", evicted);
        }
        agent
    }
}

impl<A> Default for AgentCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for AgentCache<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}
