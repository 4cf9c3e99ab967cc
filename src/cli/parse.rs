//! CLI parse: clap types for Rolodeck. No behavior; definitions only.

use crate::logging::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rolodeck CLI - contact book with fuzzy search
#[derive(Parser)]
#[command(name = "rolodeck")]
#[command(about = "Durable contact book with fuzzy search and simulated latency")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root used to find config/config.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides layered config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sled database directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep contacts in memory only for this invocation
    #[arg(long, conflicts_with = "store")]
    pub memory: bool,

    /// Disable simulated latency
    #[arg(long)]
    pub no_latency: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List contacts, optionally filtered by a fuzzy query on first/last name
    List {
        query: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create an empty contact
    Create {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one contact
    Show {
        id: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Edit fields of a contact
    Edit {
        id: String,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        twitter: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Clear a field (repeatable)
        #[arg(long, value_enum)]
        clear: Vec<EditableField>,
    },
    /// Delete a contact
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Mark or unmark a contact as favorite
    Favorite {
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EditableField {
    First,
    Last,
    Twitter,
    Avatar,
    Notes,
    Favorite,
}
