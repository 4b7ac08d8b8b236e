// CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use whatsnew::config::DEFAULT_LOOKUP_BASE;

/// Show an app's App Store release notes once per installed version.
#[derive(Parser, Debug)]
#[command(name = "whatsnew")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// App Store ID of the app to look up
    #[arg(long, env = "WHATSNEW_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Version of the app currently installed
    #[arg(long, env = "WHATSNEW_INSTALLED_VERSION", global = true)]
    pub installed_version: Option<String>,

    /// Lookup API host
    #[arg(long, env = "WHATSNEW_LOOKUP_URL", default_value = DEFAULT_LOOKUP_BASE, global = true)]
    pub lookup_url: String,

    /// Lookup request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Directory for cached data (default: the per-user cache directory)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Print the sheet as text instead of opening a full-screen view
    #[arg(long, global = true)]
    pub plain: bool,

    /// Sheet title
    #[arg(long, default_value = "What's New", global = true)]
    pub title: String,

    /// Label of the dismiss control
    #[arg(long, default_value = "Dismiss", global = true)]
    pub dismiss_label: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Commands {
    /// Show the release notes if they have not been shown for the installed version
    Check,
    /// Show the release notes now
    Show {
        /// Only trust cached notes for the installed version and app
        #[arg(long)]
        fresh: bool,
    },
    /// Print the lookup record as JSON
    Lookup {
        /// Only trust cached notes for the installed version and app
        #[arg(long)]
        fresh: bool,
    },
    /// Prime the cache without showing anything
    Prefetch,
    /// Forget the cached lookup and the last shown version
    Reset,
}

impl Commands {
    /// Whether the command needs `--installed-version`. Anything that can
    /// present or write the shown-version marker does.
    pub fn needs_installed_version(self) -> bool {
        match self {
            Commands::Check | Commands::Show { .. } | Commands::Prefetch => true,
            Commands::Lookup { fresh } => fresh,
            Commands::Reset => false,
        }
    }
}
