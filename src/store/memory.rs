//! In-memory Contact Store.
//!
//! Holds the same serialized blob the sled store writes, so round-trip
//! behavior matches the durable backend. Failure can be injected to exercise
//! `StorageUnavailable` paths.

use crate::error::ContactError;
use crate::store::{decode, encode, ContactStore};
use crate::types::Contact;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryContactStore {
    blob: RwLock<Option<Vec<u8>>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `contacts`. Seeding does not count as a write.
    pub fn with_contacts(contacts: &[Contact]) -> Result<Self, ContactError> {
        let store = Self::new();
        *store.blob.write() = Some(encode(contacts)?);
        Ok(store)
    }

    /// Make every subsequent `get`/`set` fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), ContactError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ContactError::StorageUnavailable(
                "in-memory medium marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get(&self) -> Result<Vec<Contact>, ContactError> {
        self.check_available()?;
        match self.blob.read().as_deref() {
            Some(raw) => decode(raw),
            None => Ok(Vec::new()),
        }
    }

    async fn set(&self, contacts: &[Contact]) -> Result<(), ContactError> {
        self.check_available()?;
        let value = encode(contacts)?;
        *self.blob.write() = Some(value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
