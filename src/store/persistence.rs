//! Persistence layer for the Contact Store

use crate::error::ContactError;
use crate::store::{decode, encode, ContactStore, CONTACTS_KEY};
use crate::types::Contact;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Sled-based implementation of ContactStore
#[derive(Clone)]
pub struct SledContactStore {
    db: sled::Db,
}

impl SledContactStore {
    /// Open (or create) a sled database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContactError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            ContactError::StorageUnavailable(format!(
                "Failed to open sled database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self { db })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }
}

#[async_trait]
impl ContactStore for SledContactStore {
    async fn get(&self) -> Result<Vec<Contact>, ContactError> {
        let Some(raw) = self.db.get(CONTACTS_KEY.as_bytes()).map_err(to_storage_io)? else {
            return Ok(Vec::new());
        };
        decode(&raw)
    }

    async fn set(&self, contacts: &[Contact]) -> Result<(), ContactError> {
        let value = encode(contacts)?;
        // Single key insert: readers observe either the old or the new collection.
        self.db
            .insert(CONTACTS_KEY.as_bytes(), value)
            .map_err(to_storage_io)?;
        self.db.flush().map_err(to_storage_io)?;
        debug!(count = contacts.len(), "Persisted contact collection");
        Ok(())
    }
}

fn to_storage_io(err: sled::Error) -> ContactError {
    ContactError::StorageUnavailable(format!("sled: {}", err))
}
