//! Shared test utilities for integration tests
//!
//! Store wrappers that let a test hold a write open, fail writes, or slow
//! reads down, plus helpers to build services over them.

use async_trait::async_trait;
use rolodeck::latency::{LatencyConfig, LatencySimulator};
use rolodeck::store::{ContactStore, MemoryContactStore, SledContactStore};
use rolodeck::{Contact, ContactError, ContactId, ContactService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// Service over `store` with latency disabled.
pub fn instant_service(store: Arc<dyn ContactStore>) -> ContactService {
    ContactService::new(
        store,
        Arc::new(LatencySimulator::new(LatencyConfig::disabled())),
    )
}

/// Sled-backed store in a fresh temp directory. Keep the `TempDir` alive.
pub fn sled_store() -> (Arc<SledContactStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SledContactStore::open(dir.path()).unwrap();
    (Arc::new(store), dir)
}

pub fn contact(id: &str, first: &str, last: &str, created_at: i64) -> Contact {
    let mut contact = Contact::new(ContactId::from(id), created_at);
    contact.first = Some(first.to_string());
    contact.last = Some(last.to_string());
    contact
}

/// Store whose `set` blocks until the test releases it.
pub struct GatedStore {
    inner: MemoryContactStore,
    gate: Semaphore,
    waiting: AtomicUsize,
}

impl GatedStore {
    pub fn new(contacts: &[Contact]) -> Self {
        Self {
            inner: MemoryContactStore::with_contacts(contacts).unwrap(),
            gate: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Let one blocked (or future) `set` through.
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    /// Number of `set` calls that have started, including finished ones.
    pub fn sets_started(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.inner.write_count()
    }

    /// Yield until `n` writes have started.
    pub async fn until_sets_started(&self, n: usize) {
        while self.sets_started() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Yield until `n` writes have completed.
    pub async fn until_written(&self, n: usize) {
        while self.write_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ContactStore for GatedStore {
    async fn get(&self) -> Result<Vec<Contact>, ContactError> {
        self.inner.get().await
    }

    async fn set(&self, contacts: &[Contact]) -> Result<(), ContactError> {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ContactError::StorageUnavailable(e.to_string()))?;
        permit.forget();
        self.inner.set(contacts).await
    }
}

/// Store that reads fine but rejects every write.
pub struct FailingWrites {
    inner: MemoryContactStore,
}

impl FailingWrites {
    pub fn new(contacts: &[Contact]) -> Self {
        Self {
            inner: MemoryContactStore::with_contacts(contacts).unwrap(),
        }
    }
}

#[async_trait]
impl ContactStore for FailingWrites {
    async fn get(&self) -> Result<Vec<Contact>, ContactError> {
        self.inner.get().await
    }

    async fn set(&self, _contacts: &[Contact]) -> Result<(), ContactError> {
        Err(ContactError::StorageUnavailable("quota exceeded".to_string()))
    }
}

/// Store whose `get` takes `delay` of (tokio) time.
pub struct SlowStore {
    pub inner: MemoryContactStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(contacts: &[Contact], delay: Duration) -> Self {
        Self {
            inner: MemoryContactStore::with_contacts(contacts).unwrap(),
            delay,
        }
    }
}

#[async_trait]
impl ContactStore for SlowStore {
    async fn get(&self) -> Result<Vec<Contact>, ContactError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get().await
    }

    async fn set(&self, contacts: &[Contact]) -> Result<(), ContactError> {
        self.inner.set(contacts).await
    }
}
