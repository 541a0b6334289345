use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mesh_agent_client::cache::{AgentCache, DEFAULT_CAPACITY};
use mesh_agent_client::{CacheKey, TlsSettings};

fn key(n: usize) -> CacheKey {
    CacheKey::direct(
        true,
        None,
        &TlsSettings {
            ca: vec![format!("ca-{n}")],
            ..TlsSettings::default()
        },
    )
}

fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("Test capacity should be non-zero")
}

#[test]
fn test_default_capacity() {
    let cache: AgentCache<usize> = AgentCache::new();
    assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    assert_eq!(DEFAULT_CAPACITY, 50);
    assert!(cache.is_empty());
}

#[test]
fn test_hit_returns_same_instance_and_skips_build() {
    let cache: AgentCache<String> = AgentCache::new();
    let builds = AtomicUsize::new(0);
    let build = || {
        builds.fetch_add(1, Ordering::SeqCst);
        "agent".to_owned()
    };

    let first = cache.get_or_create(key(1), build);
    let second = cache.get_or_create(key(1), || unreachable!("hit must not build"));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 1, 0));
}

#[test]
fn test_never_exceeds_capacity() {
    let cache: AgentCache<usize> = AgentCache::new();
    for n in 0..120 {
        cache.get_or_create(key(n), || n);
        assert!(cache.len() <= DEFAULT_CAPACITY);
    }
    assert_eq!(cache.len(), DEFAULT_CAPACITY);
    assert_eq!(cache.stats().evictions, 70);
}

#[test]
fn test_evicts_least_recently_used() {
    let cache: AgentCache<usize> = AgentCache::with_capacity(capacity(3));
    cache.get_or_create(key(1), || 1);
    cache.get_or_create(key(2), || 2);
    cache.get_or_create(key(3), || 3);

    // Touch 1 so 2 becomes the oldest entry
    cache.get_or_create(key(1), || unreachable!("1 is cached"));
    cache.get_or_create(key(4), || 4);

    assert!(cache.contains(&key(1)));
    assert!(!cache.contains(&key(2)));
    assert!(cache.contains(&key(3)));
    assert!(cache.contains(&key(4)));

    // The evicted key is a miss and gets rebuilt
    let rebuilt = cache.get_or_create(key(2), || 22);
    assert_eq!(*rebuilt, 22);
}

#[test]
fn test_peek_does_not_promote() {
    let cache: AgentCache<usize> = AgentCache::with_capacity(capacity(2));
    cache.get_or_create(key(1), || 1);
    cache.get_or_create(key(2), || 2);

    assert_eq!(cache.peek(&key(1)).as_deref(), Some(&1));
    cache.get_or_create(key(3), || 3);

    assert!(!cache.contains(&key(1)));
    assert!(cache.contains(&key(2)));
}

#[test]
fn test_declined_build_is_not_cached() {
    let cache: AgentCache<usize> = AgentCache::new();
    let attempts = AtomicUsize::new(0);

    for _ in 0..3 {
        let result = cache.get_or_try_create(key(9), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            None
        });
        assert!(result.is_none());
    }

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_callers_build_once() {
    let cache: Arc<AgentCache<usize>> = Arc::new(AgentCache::new());
    let builds = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let builds = Arc::clone(&builds);
            std::thread::spawn(move || {
                cache.get_or_create(key(7), || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    7
                })
            })
        })
        .collect();

    let agents: Vec<Arc<usize>> = handles
        .into_iter()
        .map(|h| h.join().expect("Worker thread should not panic"))
        .collect();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(agents.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
