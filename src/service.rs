//! Contact Service
//!
//! Create, read, update, delete and list operations. Each one passes the
//! latency gate first and then does a full read-modify-write of the whole
//! collection against the [`ContactStore`].
//!
//! The read-modify-write is not atomic across its own suspension points: two
//! overlapping mutations race and the last `set` to complete wins.

use crate::config::{RolodeckConfig, StorageBackend};
use crate::error::ContactError;
use crate::latency::LatencySimulator;
use crate::query::{filter_and_sort, normalize_query, QueryConfig};
use crate::store::{ContactStore, MemoryContactStore, SledContactStore};
use crate::types::{now_millis, Contact, ContactId, ContactPatch};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Upper bound on one operation's total suspended time. `None` means unbounded.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl ServiceConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.deadline_ms == Some(0) {
            return Err("deadline_ms must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

/// Latency key of a single-contact read.
pub fn contact_key(id: &ContactId) -> String {
    format!("contact:{}", id)
}

/// Latency key of a listing. Absent and empty queries share one key.
pub fn list_key(query: Option<&str>) -> String {
    format!("contacts:{}", normalize_query(query).unwrap_or(""))
}

pub struct ContactService {
    store: Arc<dyn ContactStore>,
    latency: Arc<LatencySimulator>,
    query: QueryConfig,
    deadline: Option<Duration>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>, latency: Arc<LatencySimulator>) -> Self {
        Self {
            store,
            latency,
            query: QueryConfig::default(),
            deadline: None,
        }
    }

    /// Build the store and latency gate described by `config`.
    pub fn from_config(config: &RolodeckConfig) -> Result<Self, ContactError> {
        let store: Arc<dyn ContactStore> = match config.storage.backend {
            StorageBackend::Sled => Arc::new(SledContactStore::open(&config.storage.path)?),
            StorageBackend::Memory => Arc::new(MemoryContactStore::new()),
        };
        let latency = Arc::new(LatencySimulator::new(config.latency.clone()));
        Ok(Self::new(store, latency)
            .with_query_config(config.query.clone())
            .with_deadline(config.service.deadline()))
    }

    pub fn with_query_config(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContactStore> {
        &self.store
    }

    pub fn latency(&self) -> &Arc<LatencySimulator> {
        &self.latency
    }

    /// Create an empty contact at the front of the collection.
    pub async fn create(&self) -> Result<Contact, ContactError> {
        self.bounded("create", async {
            self.latency.uncached().await;
            let mut contacts = self.store.get().await?;

            let mut id = ContactId::generate();
            while contacts.iter().any(|c| c.id == id) {
                id = ContactId::generate();
            }
            let contact = Contact::new(id, now_millis());
            contacts.insert(0, contact.clone());

            self.store.set(&contacts).await?;
            info!(id = %contact.id, "Created contact");
            Ok(contact)
        })
        .await
    }

    /// Look up one contact. `Ok(None)` is the not-found sentinel.
    pub async fn read(&self, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        self.bounded("read", async {
            self.latency.request(Some(contact_key(id).as_str())).await;
            let contacts = self.store.get().await?;
            Ok(contacts.into_iter().find(|c| &c.id == id))
        })
        .await
    }

    /// Re-read a contact, ignoring any cached latency entry for it.
    pub async fn revalidate(&self, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        self.latency.invalidate(&contact_key(id));
        self.read(id).await
    }

    /// Merge `patch` onto an existing contact.
    pub async fn update(&self, id: &ContactId, patch: ContactPatch) -> Result<Contact, ContactError> {
        self.bounded("update", async {
            self.latency.uncached().await;
            let mut contacts = self.store.get().await?;

            let Some(contact) = contacts.iter_mut().find(|c| &c.id == id) else {
                return Err(ContactError::NotFound(id.clone()));
            };
            patch.apply(contact);
            let updated = contact.clone();

            self.store.set(&contacts).await?;
            info!(id = %id, "Updated contact");
            Ok(updated)
        })
        .await
    }

    /// Remove a contact. Returns false (and writes nothing) if it is absent.
    pub async fn delete(&self, id: &ContactId) -> Result<bool, ContactError> {
        self.bounded("delete", async {
            self.latency.uncached().await;
            let mut contacts = self.store.get().await?;

            let Some(index) = contacts.iter().position(|c| &c.id == id) else {
                debug!(id = %id, "Delete of absent contact");
                return Ok(false);
            };
            contacts.remove(index);

            self.store.set(&contacts).await?;
            info!(id = %id, "Deleted contact");
            Ok(true)
        })
        .await
    }

    /// Filtered contacts in listing order.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Contact>, ContactError> {
        self.bounded("list", async {
            self.latency.request(Some(list_key(query).as_str())).await;
            let contacts = self.store.get().await?;
            Ok(filter_and_sort(contacts, query, &self.query))
        })
        .await
    }

    pub async fn set_favorite(&self, id: &ContactId, favorite: bool) -> Result<Contact, ContactError> {
        self.update(id, ContactPatch::new().favorite(favorite)).await
    }

    pub async fn list_contacts(&self, query: Option<&str>) -> Result<Vec<Contact>, ContactError> {
        self.list(query).await
    }

    pub async fn create_contact(&self) -> Result<Contact, ContactError> {
        self.create().await
    }

    pub async fn get_contact(&self, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        self.read(id).await
    }

    pub async fn update_contact(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> Result<Contact, ContactError> {
        self.update(id, patch).await
    }

    pub async fn delete_contact(&self, id: &ContactId) -> Result<bool, ContactError> {
        self.delete(id).await
    }

    /// Run `op` under the configured deadline.
    ///
    /// The bundled stores have no suspension point inside `set`, so a timeout
    /// can only fire before the write starts.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ContactError>
    where
        F: Future<Output = Result<T, ContactError>>,
    {
        let result = match self.deadline {
            None => fut.await,
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(ContactError::DeadlineExceeded(limit)),
            },
        };
        if let Err(e) = &result {
            if !e.is_not_found() {
                warn!(op, error = %e, "Contact operation failed");
            }
        }
        result
    }
}
