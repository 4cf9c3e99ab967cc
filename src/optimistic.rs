//! Optimistic Updates
//!
//! While a boolean mutation is in flight the proposed value is what gets
//! displayed. Once it settles, success or failure, the marker is cleared and
//! the displayed value comes only from canonical state obtained by a fresh
//! read. The speculative value is never kept as ground truth, so no rollback
//! step exists: a wrong guess is simply replaced by the revalidated value.

use crate::error::ContactError;
use crate::service::ContactService;
use crate::types::{Contact, ContactId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle for one submitted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    seq: u64,
    proposed: bool,
}

impl Submission {
    pub fn proposed(&self) -> bool {
        self.proposed
    }
}

/// In-flight marker for a single boolean field.
///
/// A newer submission supersedes an older one; settling a superseded
/// submission leaves the newer marker in place.
#[derive(Debug, Default)]
pub struct OptimisticToggle {
    pending: Mutex<Option<Submission>>,
    next_seq: AtomicU64,
}

impl OptimisticToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `proposed` as the in-flight value.
    pub fn begin(&self, proposed: bool) -> Submission {
        let submission = Submission {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            proposed,
        };
        *self.pending.lock() = Some(submission);
        submission
    }

    /// Clear the marker if `submission` is still the current one.
    pub fn settle(&self, submission: Submission) -> bool {
        let mut pending = self.pending.lock();
        if *pending == Some(submission) {
            *pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    pub fn pending_value(&self) -> Option<bool> {
        self.pending.lock().map(|s| s.proposed)
    }

    /// Value to render given the last confirmed one.
    pub fn displayed(&self, confirmed: bool) -> bool {
        self.pending_value().unwrap_or(confirmed)
    }
}

/// Settles a submission when dropped, including when the submitting future
/// is abandoned mid-flight.
struct SettleOnDrop<'a> {
    toggle: &'a OptimisticToggle,
    submission: Submission,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        self.toggle.settle(self.submission);
    }
}

/// Result of a settled submission
#[derive(Debug)]
pub struct Settlement {
    /// What the mutation itself returned
    pub mutation: Result<Contact, ContactError>,
    /// Canonical state after revalidation; `None` if the contact is gone
    pub canonical: Option<Contact>,
}

impl Settlement {
    /// Value to render once settled. An absent contact shows as not favorite.
    pub fn displayed(&self) -> bool {
        self.canonical.as_ref().map(Contact::is_favorite).unwrap_or(false)
    }
}

/// Optimistic favorite toggle for one contact
pub struct FavoriteToggle {
    service: Arc<ContactService>,
    id: ContactId,
    toggle: OptimisticToggle,
}

impl FavoriteToggle {
    pub fn new(service: Arc<ContactService>, id: ContactId) -> Self {
        Self {
            service,
            id,
            toggle: OptimisticToggle::new(),
        }
    }

    pub fn id(&self) -> &ContactId {
        &self.id
    }

    pub fn is_pending(&self) -> bool {
        self.toggle.is_pending()
    }

    /// Favorite flag to render for `confirmed`, honoring an in-flight submission.
    pub fn displayed(&self, confirmed: &Contact) -> bool {
        self.toggle.displayed(confirmed.is_favorite())
    }

    /// Submit `proposed`, settle, then revalidate.
    ///
    /// A failed mutation is reported in [`Settlement::mutation`]; the outer
    /// error is only returned when the revalidating read itself fails.
    pub async fn submit(&self, proposed: bool) -> Result<Settlement, ContactError> {
        let guard = SettleOnDrop {
            toggle: &self.toggle,
            submission: self.toggle.begin(proposed),
        };
        debug!(id = %self.id, proposed, "Optimistic favorite submitted");

        let mutation = self.service.set_favorite(&self.id, proposed).await;
        drop(guard);
        if let Err(e) = &mutation {
            warn!(id = %self.id, error = %e, "Favorite mutation failed; revalidating");
        }

        let canonical = self.service.revalidate(&self.id).await?;
        Ok(Settlement {
            mutation,
            canonical,
        })
    }
}
