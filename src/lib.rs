//! Rolodeck: Durable Contact Book
//!
//! A contact persistence and query layer. Contacts live as one serialized
//! collection in a key-value store; listings are filtered by fuzzy name
//! matching and ordered by last name then creation time. Every operation
//! passes a simulated-latency gate, and boolean edits can be shown
//! optimistically while they are in flight.

pub mod cli;
pub mod config;
pub mod error;
pub mod latency;
pub mod logging;
pub mod optimistic;
pub mod query;
pub mod service;
pub mod store;
pub mod types;

pub use error::ContactError;
pub use service::ContactService;
pub use store::ContactStore;
pub use types::{Contact, ContactId, ContactPatch, FieldUpdate};
