//! Error types for the Rolodeck contact store.

use crate::types::ContactId;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the store, the service and the CLI.
///
/// Nothing in the crate retries or swallows these; every layer propagates them
/// to the caller, which decides how to present them.
#[derive(Debug, Error)]
pub enum ContactError {
    /// The durable medium could not be read or written (I/O failure, quota,
    /// or a stored blob that no longer decodes).
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Raised only by `update` when the id is not in the collection.
    #[error("No contact found for id {0}")]
    NotFound(ContactId),

    /// The configured upper bound on suspended time was exceeded.
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ContactError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContactError::NotFound(_))
    }
}

impl From<config::ConfigError> for ContactError {
    fn from(err: config::ConfigError) -> Self {
        ContactError::Config(err.to_string())
    }
}
