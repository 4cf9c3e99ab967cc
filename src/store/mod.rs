//! Contact Store
//!
//! Durable persistence of the whole contact collection as a single blob under
//! one logical key. There are no per-record writes and no secondary indices:
//! every `set` replaces the previous collection wholesale.

pub mod memory;
pub mod persistence;

pub use memory::MemoryContactStore;
pub use persistence::SledContactStore;

use crate::error::ContactError;
use crate::types::Contact;
use async_trait::async_trait;

/// Logical key the collection lives under.
pub const CONTACTS_KEY: &str = "contacts";

/// Contact collection store interface
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Current ordered collection, or an empty one if nothing was ever stored.
    async fn get(&self) -> Result<Vec<Contact>, ContactError>;

    /// Atomically replace the stored collection. Last `set` wins.
    async fn set(&self, contacts: &[Contact]) -> Result<(), ContactError>;
}

/// Encode a collection into the persisted blob format.
pub(crate) fn encode(contacts: &[Contact]) -> Result<Vec<u8>, ContactError> {
    serde_json::to_vec(contacts).map_err(|e| {
        ContactError::StorageUnavailable(format!("Failed to serialize contacts: {}", e))
    })
}

/// Decode a persisted blob. A blob that does not parse is reported as an
/// unavailable medium rather than silently replaced.
pub(crate) fn decode(raw: &[u8]) -> Result<Vec<Contact>, ContactError> {
    serde_json::from_slice(raw).map_err(|e| {
        ContactError::StorageUnavailable(format!("Failed to deserialize contacts: {}", e))
    })
}
