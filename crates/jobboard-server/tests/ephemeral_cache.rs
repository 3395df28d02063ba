//! Lazy-expiry behavior of the ephemeral cache, driven by a paused clock.

use std::sync::Arc;
use std::time::Duration;

use jobboard_server::EphemeralCache;
use jobboard_server::cache::DEFAULT_TTL;
use serde_json::{Value, json};
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn hit_returns_the_stored_value_itself() {
    let cache: EphemeralCache<Value> = EphemeralCache::new();
    let payload = Arc::new(json!([{ "id": 1 }, { "id": 2 }]));

    cache.set("jobs-featured-2", Arc::clone(&payload), Duration::from_secs(10));
    advance(Duration::from_secs(9)).await;

    let hit = cache.get("jobs-featured-2").expect("fresh entry");
    assert!(Arc::ptr_eq(&hit, &payload));
}

#[tokio::test(start_paused = true)]
async fn expired_entry_is_removed_on_read() {
    let cache: EphemeralCache<&'static str> = EphemeralCache::new();

    cache.set("k", "v", Duration::from_millis(100));
    advance(Duration::from_millis(150)).await;

    assert!(cache.get("k").is_none());
    assert!(!cache.contains_raw("k"), "stale entry must be deleted, not masked");
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn default_ttl_is_five_minutes() {
    assert_eq!(DEFAULT_TTL, Duration::from_millis(300_000));

    let cache: EphemeralCache<u32> = EphemeralCache::new();
    cache.set_default("k", 1u32);

    advance(Duration::from_millis(300_000)).await;
    assert_eq!(cache.get("k").as_deref(), Some(&1));

    advance(Duration::from_millis(1)).await;
    assert!(cache.get("k").is_none());
}

#[tokio::test(start_paused = true)]
async fn overwrite_resets_timestamp_and_ttl() {
    let cache: EphemeralCache<u32> = EphemeralCache::new();

    cache.set("k", 1u32, Duration::from_millis(100));
    advance(Duration::from_millis(99)).await;

    cache.set("k", 2u32, Duration::from_millis(1000));
    advance(Duration::from_millis(50)).await;
    assert_eq!(cache.get("k").as_deref(), Some(&2));

    advance(Duration::from_millis(900)).await;
    assert_eq!(cache.get("k").as_deref(), Some(&2));
}

#[tokio::test(start_paused = true)]
async fn overwrite_can_shorten_ttl() {
    let cache: EphemeralCache<u32> = EphemeralCache::new();

    cache.set("k", 1u32, Duration::from_secs(60));
    cache.set("k", 2u32, Duration::from_millis(10));
    advance(Duration::from_millis(20)).await;

    assert!(cache.get("k").is_none());
}

#[tokio::test(start_paused = true)]
async fn featured_jobs_end_to_end() {
    let cache: EphemeralCache<Value> = EphemeralCache::new();
    let jobs = json!([{ "id": 1 }]);

    cache.set("jobs-featured-5", jobs.clone(), Duration::from_millis(1000));

    advance(Duration::from_millis(500)).await;
    assert_eq!(cache.get("jobs-featured-5").as_deref(), Some(&jobs));

    advance(Duration::from_millis(1000)).await;
    assert!(cache.get("jobs-featured-5").is_none());
}

#[tokio::test(start_paused = true)]
async fn keys_are_independent() {
    let cache: EphemeralCache<u32> = EphemeralCache::new();

    cache.set("short", 1u32, Duration::from_millis(10));
    cache.set("long", 2u32, Duration::from_secs(10));
    advance(Duration::from_millis(20)).await;

    assert!(cache.get("short").is_none());
    assert_eq!(cache.get("long").as_deref(), Some(&2));
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clones_share_entries() {
    let cache: EphemeralCache<u32> = EphemeralCache::new();
    let handle = cache.clone();

    handle.set_default("shared", 5u32);
    assert_eq!(cache.get("shared").as_deref(), Some(&5));
}
