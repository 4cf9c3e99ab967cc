//! Latency gate as seen through the service

use rolodeck::latency::{DedupCache, LatencyConfig, LatencySimulator, RequestOutcome};
use rolodeck::service::{contact_key, list_key};
use rolodeck::store::MemoryContactStore;
use rolodeck::ContactService;
use std::sync::Arc;
use tokio::time::Instant;

fn seeded(max_delay_ms: u64, cache: Arc<DedupCache>) -> Arc<LatencySimulator> {
    let config = LatencyConfig {
        enabled: true,
        max_delay_ms,
    };
    Arc::new(LatencySimulator::with_cache(config, cache).with_seed(11))
}

#[tokio::test(start_paused = true)]
async fn unkeyed_request_makes_keys_pay_again() {
    let latency = seeded(800, Arc::new(DedupCache::new()));

    assert!(matches!(
        latency.request(Some("contacts:")).await,
        RequestOutcome::Delayed(_)
    ));
    assert_eq!(latency.request(Some("contacts:")).await, RequestOutcome::Hit);

    assert_eq!(latency.request(None).await, RequestOutcome::Cleared);
    assert!(matches!(
        latency.request(Some("contacts:")).await,
        RequestOutcome::Delayed(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn mutation_clears_cached_reads() {
    let cache = Arc::new(DedupCache::new());
    let store = Arc::new(MemoryContactStore::new());
    let service = ContactService::new(store, seeded(800, cache.clone()));

    service.list(None).await.unwrap();
    assert!(cache.contains(&list_key(None)));

    let start = Instant::now();
    service.list(None).await.unwrap();
    assert_eq!(start.elapsed(), std::time::Duration::ZERO, "second listing is a hit");

    let created = service.create().await.unwrap();
    assert!(cache.is_empty());

    service.read(&created.id).await.unwrap();
    assert!(cache.contains(&contact_key(&created.id)));
}

#[tokio::test(start_paused = true)]
async fn shared_cache_is_visible_to_both_simulators() {
    let cache = Arc::new(DedupCache::new());
    let a = seeded(100, cache.clone());
    let b = seeded(100, cache.clone());

    a.request(Some("contact:1")).await;
    assert_eq!(b.request(Some("contact:1")).await, RequestOutcome::Hit);

    b.reset();
    assert!(!a.is_cached("contact:1"));
}
