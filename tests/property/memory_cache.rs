//! Property tests for the memory cache.
//!
//! Invariants tested:
//! - Entry count never exceeds `max_entry_count`
//! - Exactly the most recent K distinct keys survive
//! - The eviction queue stays in step with the entry table

use outbound_resilience_cache::{MemoryCache, MemoryCacheConfig};
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the cache keeps the newest K distinct keys
    #[test]
    fn keeps_newest_keys(max_entry_count in 1usize..=16, keys in prop::collection::vec(0u8..32, 0..80)) {
        let cache = MemoryCache::<u8>::new(
            MemoryCacheConfig::builder()
                .expiration(Duration::from_secs(60))
                .max_entry_count(max_entry_count)
                .build()
                .unwrap(),
        );
        let expires = Instant::now() + Duration::from_secs(60);
        let mut order: Vec<u8> = Vec::new();

        for key in keys {
            cache.insert(key.to_string(), key, expires);
            order.retain(|k| *k != key);
            order.push(key);
            if order.len() > max_entry_count {
                order.remove(0);
            }

            prop_assert!(cache.len() <= max_entry_count);
            prop_assert_eq!(cache.len(), cache.queued_len());
        }

        prop_assert_eq!(cache.len(), order.len());
        for key in order {
            prop_assert!(cache.contains_key(&key.to_string()));
        }
    }
}
