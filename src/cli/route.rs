//! CLI route: run context and single route table dispatching to the contact service.

use crate::cli::output::{format_contact_list_text, format_contact_text, format_json, map_error};
use crate::cli::parse::{Commands, EditableField};
use crate::config::{ConfigLoader, RolodeckConfig, StorageBackend};
use crate::error::ContactError;
use crate::latency::LatencyConfig;
use crate::optimistic::FavoriteToggle;
use crate::service::ContactService;
use crate::types::{ContactId, ContactPatch, FieldUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Flags that adjust the loaded configuration for one invocation
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub memory: bool,
    pub no_latency: bool,
}

/// Runtime context for CLI execution: configuration, service and async runtime.
pub struct RunContext {
    service: Arc<ContactService>,
    runtime: Runtime,
}

impl RunContext {
    /// Load configuration from `config_path`, or the layered sources under `root`.
    pub fn new(
        root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: Overrides,
    ) -> Result<Self, ContactError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&root)?,
        };
        Self::from_config(apply_overrides(config, &overrides))
    }

    pub fn from_config(config: RolodeckConfig) -> Result<Self, ContactError> {
        // Operations interleave cooperatively on one thread.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| ContactError::Config(format!("Failed to start runtime: {}", e)))?;
        let service = Arc::new(ContactService::from_config(&config)?);
        Ok(Self { service, runtime })
    }

    pub fn service(&self) -> &Arc<ContactService> {
        &self.service
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ContactError> {
        match command {
            Commands::List { query, format } => {
                let contacts = self
                    .runtime
                    .block_on(self.service.list(query.as_deref()))?;
                if format == "json" {
                    format_json(&contacts)
                } else {
                    Ok(format_contact_list_text(&contacts))
                }
            }
            Commands::Create { format } => {
                let contact = self.runtime.block_on(self.service.create())?;
                if format == "json" {
                    format_json(&contact)
                } else {
                    Ok(format!("Created contact {}", contact.id))
                }
            }
            Commands::Show { id, format } => {
                let id = ContactId::from(id.as_str());
                let contact = self
                    .runtime
                    .block_on(self.service.read(&id))?
                    .ok_or(ContactError::NotFound(id))?;
                if format == "json" {
                    format_json(&contact)
                } else {
                    Ok(format_contact_text(&contact))
                }
            }
            Commands::Edit {
                id,
                first,
                last,
                twitter,
                avatar,
                notes,
                clear,
            } => {
                let patch = build_patch(first, last, twitter, avatar, notes, clear);
                if patch.is_empty() {
                    return Ok("Nothing to change".to_string());
                }
                let id = ContactId::from(id.as_str());
                let contact = self.runtime.block_on(self.service.update(&id, patch))?;
                Ok(format_contact_text(&contact))
            }
            Commands::Delete { id, yes } => {
                if !*yes {
                    let confirmed = dialoguer::Confirm::new()
                        .with_prompt("Please confirm you want to delete this record.")
                        .default(false)
                        .interact()
                        .map_err(|e| {
                            ContactError::Config(format!("Failed to get user input: {}", e))
                        })?;
                    if !confirmed {
                        return Ok("Delete cancelled".to_string());
                    }
                }
                let id = ContactId::from(id.as_str());
                if self.runtime.block_on(self.service.delete(&id))? {
                    Ok(format!("Deleted contact {}", id))
                } else {
                    Ok(format!("No contact with id {}; nothing deleted", id))
                }
            }
            Commands::Favorite { id, value } => self.handle_favorite(id, *value),
        }
    }

    fn handle_favorite(&self, id: &str, value: bool) -> Result<String, ContactError> {
        let id = ContactId::from(id);
        let service = Arc::clone(&self.service);
        self.runtime.block_on(async move {
            let current = service
                .read(&id)
                .await?
                .ok_or_else(|| ContactError::NotFound(id.clone()))?;
            let toggle = FavoriteToggle::new(Arc::clone(&service), id.clone());

            // Join polls `submit` first, so this sees the state right after its
            // first suspension, or after it has already settled.
            let observe = async { (toggle.is_pending(), toggle.displayed(&current)) };
            let (settlement, (was_pending, shown_while_pending)) =
                futures::future::join(toggle.submit(value), observe).await;
            let settlement = settlement?;

            let mut lines = Vec::new();
            if was_pending {
                lines.push(format!("favorite (pending):   {}", shown_while_pending));
            }
            if let Err(e) = &settlement.mutation {
                lines.push(format!("update failed: {}", map_error(e)));
            }
            lines.push(format!("favorite (confirmed): {}", settlement.displayed()));
            Ok::<_, ContactError>(lines.join("\n"))
        })
    }
}

fn apply_overrides(mut config: RolodeckConfig, overrides: &Overrides) -> RolodeckConfig {
    if let Some(ref store) = overrides.store {
        config.storage.backend = StorageBackend::Sled;
        config.storage.path = store.clone();
    }
    if overrides.memory {
        config.storage.backend = StorageBackend::Memory;
    }
    if overrides.no_latency {
        config.latency = LatencyConfig::disabled();
    }
    config
}

fn build_patch(
    first: &Option<String>,
    last: &Option<String>,
    twitter: &Option<String>,
    avatar: &Option<String>,
    notes: &Option<String>,
    clear: &[EditableField],
) -> ContactPatch {
    fn set_or_keep(value: &Option<String>) -> FieldUpdate<String> {
        match value {
            Some(v) => FieldUpdate::Set(v.clone()),
            None => FieldUpdate::Keep,
        }
    }

    let mut patch = ContactPatch {
        first: set_or_keep(first),
        last: set_or_keep(last),
        twitter_handle: set_or_keep(twitter),
        avatar_url: set_or_keep(avatar),
        notes: set_or_keep(notes),
        favorite: FieldUpdate::Keep,
    };
    for field in clear {
        match field {
            EditableField::First => patch.first = FieldUpdate::Clear,
            EditableField::Last => patch.last = FieldUpdate::Clear,
            EditableField::Twitter => patch.twitter_handle = FieldUpdate::Clear,
            EditableField::Avatar => patch.avatar_url = FieldUpdate::Clear,
            EditableField::Notes => patch.notes = FieldUpdate::Clear,
            EditableField::Favorite => patch.favorite = FieldUpdate::Clear,
        }
    }
    patch
}
