//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "itemshelf", version, about = "Manage items stored in a local shelf database")]
pub struct Cli {
    /// TOML settings file; defaults plus `ITEMSHELF_*` variables when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path override (`:memory:` for a throwaway store).
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List items in insertion order.
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        /// Page size; the configured default when omitted.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one item.
    Get { id: String },
    /// Create an item.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace name and description of an item.
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an item and print what was removed.
    Delete { id: String },
    /// Print the core library version.
    Version,
}
