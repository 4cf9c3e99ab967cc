//! CLI output: contact formatting and error mapping to the CLI surface.

use crate::error::ContactError;
use crate::types::Contact;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ContactError) -> String {
    match e {
        ContactError::NotFound(id) => format!("Not Found: no contact with id {}", id),
        ContactError::DeadlineExceeded(limit) => {
            format!("Request timed out after {} ms; nothing was changed", limit.as_millis())
        }
        other => other.to_string(),
    }
}

fn star(contact: &Contact) -> &'static str {
    if contact.is_favorite() {
        "★"
    } else {
        "☆"
    }
}

fn name_or_placeholder(contact: &Contact) -> String {
    contact
        .display_name()
        .unwrap_or_else(|| "No Name".to_string())
}

pub fn format_contact_list_text(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Name", "Twitter", "ID"]);
    for contact in contacts {
        table.add_row(vec![
            star(contact).to_string(),
            name_or_placeholder(contact),
            contact.twitter_handle.clone().unwrap_or_default(),
            contact.id.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_contact_text(contact: &Contact) -> String {
    let mut lines = vec![format!(
        "{} {}",
        name_or_placeholder(contact).bold(),
        star(contact)
    )];
    lines.push(format!("id:      {}", contact.id));
    lines.push(format!("avatar:  {}", contact.avatar_or_default()));
    if let Some(url) = contact.twitter_url() {
        lines.push(format!("twitter: {}", url));
    }
    if let Some(notes) = contact.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("notes:   {}", notes));
    }
    if let Some(created) = chrono::DateTime::from_timestamp_millis(contact.created_at) {
        lines.push(format!("created: {}", created.to_rfc3339()));
    }
    lines.join("\n")
}

pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ContactError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ContactError::Config(format!("Failed to render JSON: {}", e)))
}
