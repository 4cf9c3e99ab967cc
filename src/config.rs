//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global file
//! (~/.config/rolodeck/config.toml), then project files (config/config.toml and
//! config/{ROLODECK_ENV}.toml), then `ROLODECK__*` environment variables.

use crate::error::ContactError;
use crate::latency::LatencyConfig;
use crate::logging::LoggingConfig;
use crate::query::QueryConfig;
use crate::service::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod sources;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolodeckConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub latency: LatencyConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which medium backs the contact collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sled,
    Memory,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Directory of the sled database
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sled
}

/// `$XDG_DATA_HOME/rolodeck/store`, or `.rolodeck/store` when no home is known.
pub fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "rolodeck")
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".rolodeck/store"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    Latency(String),
    Service(String),
    Query(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Latency(msg) => write!(f, "Latency: {}", msg),
            ValidationError::Service(msg) => write!(f, "Service: {}", msg),
            ValidationError::Query(msg) => write!(f, "Query: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StorageBackend::Sled && self.path.as_os_str().is_empty() {
            return Err("Store path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl RolodeckConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.latency.validate() {
            errors.push(ValidationError::Latency(e));
        }
        if let Err(e) = self.service.validate() {
            errors.push(ValidationError::Service(e));
        }
        if let Err(e) = self.query.validate() {
            errors.push(ValidationError::Query(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all failures into one error
    pub fn validated(self) -> Result<Self, ContactError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ContactError::Config(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Loads [`RolodeckConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Built-in defaults only
    pub fn defaults() -> RolodeckConfig {
        RolodeckConfig::default()
    }

    pub fn xdg_config_path() -> Option<PathBuf> {
        sources::global_config_path()
    }

    /// Load every layer for the project rooted at `root`
    pub fn load(root: &Path) -> Result<RolodeckConfig, ContactError> {
        let builder = sources::add_files(sources::defaults()?, sources::global_config_path());
        let builder = sources::add_files(builder, sources::project_files(root));
        let builder = sources::add_environment(builder);
        let config: RolodeckConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Load defaults plus a single explicit file
    pub fn load_from_file(path: &Path) -> Result<RolodeckConfig, ContactError> {
        if !path.exists() {
            return Err(ContactError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config: RolodeckConfig = sources::defaults()?
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        config.validated()
    }
}
