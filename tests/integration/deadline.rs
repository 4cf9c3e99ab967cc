//! Deadline handling: an operation that runs out of time writes nothing

use super::test_utils::{contact, SlowStore};
use rolodeck::latency::{LatencyConfig, LatencySimulator};
use rolodeck::store::ContactStore;
use rolodeck::{ContactError, ContactId, ContactPatch, ContactService};
use std::sync::Arc;
use std::time::Duration;

fn bounded_service(store: Arc<SlowStore>, deadline_ms: u64) -> ContactService {
    ContactService::new(
        store,
        Arc::new(LatencySimulator::new(LatencyConfig::disabled())),
    )
    .with_deadline(Some(Duration::from_millis(deadline_ms)))
}

#[tokio::test(start_paused = true)]
async fn slow_update_exceeds_deadline_and_leaves_store_untouched() {
    let seed = [contact("s1", "Slow", "Poke", 1)];
    let store = Arc::new(SlowStore::new(&seed, Duration::from_secs(2)));
    let service = bounded_service(store.clone(), 100);

    let err = service
        .update(&ContactId::from("s1"), ContactPatch::new().first("Fast"))
        .await
        .unwrap_err();

    match err {
        ContactError::DeadlineExceeded(limit) => assert_eq!(limit, Duration::from_millis(100)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.inner.write_count(), 0);
    assert_eq!(store.inner.get().await.unwrap(), seed.to_vec());
}

#[tokio::test(start_paused = true)]
async fn create_and_delete_also_bounded() {
    let store = Arc::new(SlowStore::new(&[contact("s2", "A", "B", 1)], Duration::from_secs(1)));
    let service = bounded_service(store.clone(), 50);

    assert!(matches!(
        service.create().await,
        Err(ContactError::DeadlineExceeded(_))
    ));
    assert!(matches!(
        service.delete(&ContactId::from("s2")).await,
        Err(ContactError::DeadlineExceeded(_))
    ));
    assert_eq!(store.inner.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn operation_within_deadline_succeeds() {
    let store = Arc::new(SlowStore::new(&[contact("s3", "On", "Time", 1)], Duration::from_millis(10)));
    let service = bounded_service(store.clone(), 500);

    let updated = service
        .update(&ContactId::from("s3"), ContactPatch::new().notes("made it"))
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("made it"));
    assert_eq!(store.inner.write_count(), 1);
}
