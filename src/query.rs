//! Query Engine
//!
//! Fuzzy filtering and deterministic ordering for contact listings. Fuzzy
//! relevance decides which contacts are included; it never decides their order.
//! Output is always sorted by `last`, then `created_at`, and the sort is stable
//! so equal keys keep their stored (newest-first) order.

use crate::types::Contact;
use rust_fuzzy_search::fuzzy_compare;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How closely a candidate string matches a query, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ranking {
    NoMatch,
    /// Trigram similarity above the configured threshold (typo tolerance).
    Similar,
    /// Every query character appears in order, gaps allowed.
    Matches,
    /// Query is contained in the initials of the candidate's words.
    Acronym,
    Contains,
    WordStartsWith,
    StartsWith,
    Equal,
    CaseSensitiveEqual,
}

impl Ranking {
    pub fn is_match(self) -> bool {
        self > Ranking::NoMatch
    }
}

/// Query tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Minimum `fuzzy_compare` score (0.0..=1.0) for a [`Ranking::Similar`] hit
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_similarity_threshold() -> f32 {
    0.7
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}

/// Normalize a raw query: absent, empty and whitespace-only all mean "no filter".
pub fn normalize_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

/// The string a contact is matched against: first and last name joined.
pub fn search_text(contact: &Contact) -> String {
    format!(
        "{} {}",
        contact.first.as_deref().unwrap_or(""),
        contact.last.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

/// Rank `candidate` against `query`.
pub fn rank(candidate: &str, query: &str, config: &QueryConfig) -> Ranking {
    if candidate.is_empty() || query.is_empty() {
        return Ranking::NoMatch;
    }
    if candidate == query {
        return Ranking::CaseSensitiveEqual;
    }

    let candidate = candidate.to_lowercase();
    let query = query.to_lowercase();

    if candidate == query {
        return Ranking::Equal;
    }
    if candidate.starts_with(&query) {
        return Ranking::StartsWith;
    }
    if candidate.contains(&format!(" {}", query)) {
        return Ranking::WordStartsWith;
    }
    if candidate.contains(&query) {
        return Ranking::Contains;
    }
    // A single character that is not a substring cannot match any looser way.
    if query.chars().count() == 1 {
        return Ranking::NoMatch;
    }
    if acronym(&candidate).contains(&query) {
        return Ranking::Acronym;
    }
    if is_subsequence(&candidate, &query) {
        return Ranking::Matches;
    }
    if fuzzy_compare(&query, &candidate) >= config.similarity_threshold {
        return Ranking::Similar;
    }
    Ranking::NoMatch
}

fn acronym(candidate: &str) -> String {
    candidate
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter_map(|word| word.chars().next())
        .collect()
}

fn is_subsequence(candidate: &str, query: &str) -> bool {
    let mut remaining = candidate.chars();
    query
        .chars()
        .all(|wanted| remaining.by_ref().any(|c| c == wanted))
}

/// Order by `last` (absent sorts as empty), then `created_at`.
fn listing_order(a: &Contact, b: &Contact) -> Ordering {
    let a_last = a.last.as_deref().unwrap_or("");
    let b_last = b.last.as_deref().unwrap_or("");
    a_last
        .cmp(b_last)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Filter `contacts` by `query` and return them in listing order.
pub fn filter_and_sort(
    contacts: Vec<Contact>,
    query: Option<&str>,
    config: &QueryConfig,
) -> Vec<Contact> {
    let mut contacts = match normalize_query(query) {
        None => contacts,
        Some(query) => contacts
            .into_iter()
            .filter(|contact| rank(&search_text(contact), query, config).is_match())
            .collect(),
    };
    // sort_by is stable
    contacts.sort_by(listing_order);
    contacts
}
