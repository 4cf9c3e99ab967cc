//! Core data types: contact records, identifiers and typed partial updates.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque contact identifier.
///
/// Freshly generated ids carry the 122 random bits of a v4 UUID, rendered as
/// 32 lowercase hex characters. Ids read back from storage are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single contact record.
///
/// `id` and `created_at` are fixed at creation. Every other field is optional
/// and omitted from the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl Contact {
    /// Create an empty contact with the given identity.
    pub fn new(id: ContactId, created_at: i64) -> Self {
        Self {
            id,
            created_at,
            first: None,
            last: None,
            twitter_handle: None,
            avatar_url: None,
            notes: None,
            favorite: None,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }

    /// "first last", or `None` when the contact has no name at all.
    pub fn display_name(&self) -> Option<String> {
        let first = self.first.as_deref().unwrap_or("");
        let last = self.last.as_deref().unwrap_or("");
        let name = format!("{} {}", first, last).trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// The stored avatar, falling back to a generated robohash image.
    pub fn avatar_or_default(&self) -> String {
        match self.avatar_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("https://robohash.org/{}.png?size=200x200", self.id),
        }
    }

    pub fn twitter_url(&self) -> Option<String> {
        self.twitter_handle
            .as_deref()
            .filter(|handle| !handle.is_empty())
            .map(|handle| format!("https://twitter.com/{}", handle))
    }
}

/// One field of a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Leave the existing value untouched.
    #[default]
    Keep,
    Set(T),
    /// Overwrite with an absent value.
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    fn apply_to(self, target: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(value) => *target = Some(value),
            FieldUpdate::Clear => *target = None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets, `None` clears.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        }
    }
}

/// Typed shallow merge onto an existing [`Contact`].
///
/// Fields left at [`FieldUpdate::Keep`] retain their current value; the
/// identity fields cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub first: FieldUpdate<String>,
    pub last: FieldUpdate<String>,
    pub twitter_handle: FieldUpdate<String>,
    pub avatar_url: FieldUpdate<String>,
    pub notes: FieldUpdate<String>,
    pub favorite: FieldUpdate<bool>,
}

impl ContactPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self, value: impl Into<String>) -> Self {
        self.first = FieldUpdate::Set(value.into());
        self
    }

    pub fn last(mut self, value: impl Into<String>) -> Self {
        self.last = FieldUpdate::Set(value.into());
        self
    }

    pub fn twitter_handle(mut self, value: impl Into<String>) -> Self {
        self.twitter_handle = FieldUpdate::Set(value.into());
        self
    }

    pub fn avatar_url(mut self, value: impl Into<String>) -> Self {
        self.avatar_url = FieldUpdate::Set(value.into());
        self
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = FieldUpdate::Set(value.into());
        self
    }

    pub fn favorite(mut self, value: bool) -> Self {
        self.favorite = FieldUpdate::Set(value);
        self
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.first.is_keep()
            && self.last.is_keep()
            && self.twitter_handle.is_keep()
            && self.avatar_url.is_keep()
            && self.notes.is_keep()
            && self.favorite.is_keep()
    }

    /// Apply every non-`Keep` field onto `contact`, key by key.
    pub fn apply(self, contact: &mut Contact) {
        self.first.apply_to(&mut contact.first);
        self.last.apply_to(&mut contact.last);
        self.twitter_handle.apply_to(&mut contact.twitter_handle);
        self.avatar_url.apply_to(&mut contact.avatar_url);
        self.notes.apply_to(&mut contact.notes);
        self.favorite.apply_to(&mut contact.favorite);
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
