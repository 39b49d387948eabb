use outbound_resilience_cache::{Cache, MemoryCache, MemoryCacheConfig, MemoryQueue};
use outbound_resilience_core::{CorrelationId, Operation};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn value(v: &'static str) -> Operation<String> {
    Operation::new(move || async move { Ok(v.to_string()) })
}

#[tokio::test]
async fn k_plus_one_keys_evict_the_oldest() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let e = Arc::clone(&evicted);
    let cache = MemoryCache::<String>::new(
        MemoryCacheConfig::builder()
            .expiration(Duration::from_secs(60))
            .max_entry_count(3)
            .on_eviction(move |key| e.lock().unwrap().push(key.to_string()))
            .build()
            .unwrap(),
    );

    for key in ["k1", "k2", "k3", "k4"] {
        cache.execute(value("v"), key, CorrelationId::new()).await.unwrap();
    }

    assert_eq!(cache.len(), 3);
    assert!(!cache.contains_key("k1"));
    assert_eq!(*evicted.lock().unwrap(), ["k1"]);
}

#[tokio::test(start_paused = true)]
async fn periodic_collection_sweeps_expired_entries() {
    let cache = MemoryCache::<String>::new(
        MemoryCacheConfig::builder()
            .expiration(Duration::from_secs(1))
            .garbage_collect_every(2)
            .build()
            .unwrap(),
    );

    cache.insert("stale", "x".to_string(), Instant::now() + Duration::from_millis(10));
    tokio::time::advance(Duration::from_millis(10)).await;
    assert!(cache.contains_key("stale"));

    // The request counter starts at one, so the first request reaches two.
    cache.execute(value("v"), "fresh", CorrelationId::new()).await.unwrap();
    assert!(!cache.contains_key("stale"));
    assert_eq!(cache.queued_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn collected_keys_do_not_cause_spurious_evictions() {
    let cache = MemoryCache::<String>::new(
        MemoryCacheConfig::builder()
            .expiration(Duration::from_secs(60))
            .max_entry_count(2)
            .build()
            .unwrap(),
    );

    cache.insert("gone", "x".to_string(), Instant::now() + Duration::from_millis(1));
    cache.insert("kept", "y".to_string(), Instant::now() + Duration::from_secs(60));
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(cache.garbage_collect(), 1);

    cache.insert("new", "z".to_string(), Instant::now() + Duration::from_secs(60));
    assert!(cache.contains_key("kept"));
    assert!(cache.contains_key("new"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn queue_reports_what_it_pops() {
    let mut queue = MemoryQueue::new(1);
    assert!(!queue.push("first".to_string()).has_popped());

    let result = queue.push("second".to_string());
    assert_eq!(result.popped.as_deref(), Some("first"));
    assert_eq!(queue.len(), 1);
}
