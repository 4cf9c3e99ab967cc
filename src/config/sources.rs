//! Configuration layers, lowest precedence first: defaults, the global file,
//! project files, then the environment.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::default_store_path;

type Builder = ConfigBuilder<DefaultState>;

/// Environment variable selecting `config/{name}.toml`.
pub const ENV_SELECTOR: &str = "ROLODECK_ENV";

/// Built-in values every later layer may override.
pub fn defaults() -> Result<Builder, ConfigError> {
    Config::builder()
        .set_default("storage.backend", "sled")?
        .set_default("storage.path", default_store_path().to_string_lossy().to_string())?
        .set_default("latency.enabled", true)?
        .set_default("latency.max_delay_ms", 800)?
        .set_default("query.similarity_threshold", 0.7)
}

/// `~/.config/rolodeck/config.toml`
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("rolodeck")
            .join("config.toml")
    })
}

/// `config/config.toml` then `config/{ROLODECK_ENV}.toml` under `root`.
pub fn project_files(root: &Path) -> [PathBuf; 2] {
    let dir = root.join("config");
    let env_name = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string());
    [dir.join("config.toml"), dir.join(format!("{}.toml", env_name))]
}

/// Add each existing file in order; missing files are skipped.
pub fn add_files<I>(mut builder: Builder, paths: I) -> Builder
where
    I: IntoIterator<Item = PathBuf>,
{
    for path in paths {
        if path.is_file() {
            debug!(config_path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(false));
        }
    }
    builder
}

/// `ROLODECK__LATENCY__MAX_DELAY_MS=100` overrides `latency.max_delay_ms`.
pub fn add_environment(builder: Builder) -> Builder {
    builder.add_source(
        Environment::with_prefix("ROLODECK")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
