//! CLI domain: parse, route and output only.
//! No domain logic; the route table dispatches to the contact service.

mod output;
mod parse;
mod route;

pub use output::{format_contact_list_text, format_contact_text, map_error};
pub use parse::{Cli, Commands, EditableField};
pub use route::{Overrides, RunContext};
