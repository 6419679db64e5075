use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::selection::SelectionPolicy;
use crate::store::OwnerScope;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "randview",
    about = "Keep a list of URLs and view them one at a time in random order",
    long_about = "randview keeps a personal list of URLs and shows them one at a time in random order. Recently shown URLs are held back so you see some variety before repeats.",
    version
)]
pub struct Cli {
    /// Act on this user's list instead of the local one
    #[arg(long, env = "RANDVIEW_USER", global = true, conflicts_with = "all")]
    pub user: Option<String>,

    /// View the combined list of every owner (read-only)
    #[arg(long, global = true)]
    pub all: bool,

    /// Where URL lists and histories are stored
    #[arg(long, env = "RANDVIEW_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// How recently shown URLs are avoided
    #[arg(long, value_enum, global = true)]
    pub policy: Option<SelectionPolicy>,

    /// Number of recently shown URLs to remember
    #[arg(long, global = true)]
    pub history_size: Option<usize>,

    /// Times a URL may appear in the history before it is held back
    #[arg(long, global = true)]
    pub frequency_cap: Option<usize>,

    /// Work on an in-memory copy of the list and history; nothing is saved
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a URL to the list
    Add { url: String },
    /// Remove a URL from the list
    #[command(alias = "rm")]
    Remove { url: String },
    /// Replace a URL with another
    Edit { old: String, new: String },
    /// List the URLs
    #[command(alias = "ls")]
    List,
    /// Pick the next URL to show
    Next,
    /// Show URLs one at a time until you quit
    View,
    /// Show or clear the recently shown URLs
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Report whether a URL is currently held back for being shown too often
    Check { url: String },
}

impl Cli {
    pub fn scope(&self) -> Result<OwnerScope> {
        if self.all {
            return Ok(OwnerScope::All);
        }
        match self.user {
            Some(ref id) => OwnerScope::user(id),
            None => Ok(OwnerScope::Local),
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            policy: self.policy,
            history_size: self.history_size,
            frequency_cap: self.frequency_cap,
            data_dir: self.data_dir.clone(),
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}
