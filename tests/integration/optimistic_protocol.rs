//! Optimistic favorite toggle against a live service

use super::test_utils::{instant_service, FailingWrites, GatedStore};
use rolodeck::optimistic::FavoriteToggle;
use rolodeck::{Contact, ContactError, ContactId};
use std::sync::Arc;
use std::time::Duration;

fn unfavorited(id: &str) -> Contact {
    Contact::new(ContactId::from(id), 1)
}

#[tokio::test]
async fn shows_proposed_value_until_settled() {
    let original = unfavorited("f1");
    let store = Arc::new(GatedStore::new(std::slice::from_ref(&original)));
    let service = Arc::new(instant_service(store.clone()));
    let toggle = FavoriteToggle::new(service, original.id.clone());

    assert!(!toggle.displayed(&original));

    let observer = async {
        store.until_sets_started(1).await;
        let shown = (toggle.is_pending(), toggle.displayed(&original));
        store.release_one();
        shown
    };
    let (settlement, (pending, shown)) = tokio::join!(toggle.submit(true), observer);
    let settlement = settlement.unwrap();

    assert!(pending);
    assert!(shown, "in-flight value should be displayed");
    assert!(!toggle.is_pending());
    assert!(settlement.mutation.is_ok());
    assert!(settlement.displayed());
    assert_eq!(settlement.canonical.unwrap().favorite, Some(true));
}

#[tokio::test]
async fn failed_write_falls_back_to_canonical() {
    let original = unfavorited("f2");
    let store = Arc::new(FailingWrites::new(std::slice::from_ref(&original)));
    let service = Arc::new(instant_service(store));
    let toggle = FavoriteToggle::new(service, original.id.clone());

    let settlement = toggle.submit(true).await.unwrap();

    assert!(matches!(
        settlement.mutation,
        Err(ContactError::StorageUnavailable(_))
    ));
    assert!(!toggle.is_pending());
    assert!(!settlement.displayed());
    assert!(!toggle.displayed(settlement.canonical.as_ref().unwrap()));
}

#[tokio::test]
async fn missing_contact_settles_as_not_found() {
    let store = Arc::new(GatedStore::new(&[]));
    let service = Arc::new(instant_service(store.clone()));
    let toggle = FavoriteToggle::new(service, ContactId::from("gone"));

    let settlement = toggle.submit(true).await.unwrap();

    assert!(settlement.mutation.as_ref().unwrap_err().is_not_found());
    assert!(settlement.canonical.is_none());
    assert!(!settlement.displayed());
    assert_eq!(store.sets_started(), 0);
}

#[tokio::test(start_paused = true)]
async fn abandoned_submit_clears_pending_marker() {
    let original = unfavorited("f4");
    let store = Arc::new(GatedStore::new(std::slice::from_ref(&original)));
    let service = Arc::new(instant_service(store.clone()));
    let toggle = FavoriteToggle::new(service, original.id.clone());

    let abandoned =
        tokio::time::timeout(Duration::from_millis(10), toggle.submit(true)).await;

    assert!(abandoned.is_err(), "write is held open, so the submit cannot finish");
    assert_eq!(store.sets_started(), 1);
    assert!(!toggle.is_pending());
    assert!(!toggle.displayed(&original));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn revalidation_ignores_cached_read() {
    use rolodeck::latency::{LatencyConfig, LatencySimulator};
    use rolodeck::store::{ContactStore, MemoryContactStore};
    use rolodeck::service::contact_key;

    let original = unfavorited("f3");
    let store = Arc::new(MemoryContactStore::with_contacts(std::slice::from_ref(&original)).unwrap());
    let latency = Arc::new(LatencySimulator::new(LatencyConfig::disabled()));
    let service = Arc::new(rolodeck::ContactService::new(store.clone(), latency.clone()));

    service.read(&original.id).await.unwrap();
    assert!(latency.is_cached(&contact_key(&original.id)));

    let toggle = FavoriteToggle::new(service, original.id.clone());
    let settlement = toggle.submit(true).await.unwrap();

    assert!(settlement.displayed());
    assert!(latency.is_cached(&contact_key(&original.id)));
    assert_eq!(store.get().await.unwrap()[0].favorite, Some(true));
}
