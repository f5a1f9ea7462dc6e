//! Clap argument definitions for the `scout` CLI.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Scout - inspect search configuration and index naming")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `scout init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.scout.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `scout index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// Domain types to resolve; defaults to every type with an [index.TYPE] section
    pub domain_types: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `scout` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize scout configuration in current directory
    Init(InitCommand),

    /// Show configuration files, index names, and validation warnings
    Status,

    /// Show effective configuration settings
    Config,

    /// Show the index name each domain type searches
    #[command(after_help = "\
EXAMPLES:
  scout index                 Every type configured in [index.TYPE] sections
  scout index books authors   Resolve specific types, prefix included
  scout index books --json    Machine-readable output")]
    Index(IndexCommand),
}

impl Commands {
    /// Whether the command reads the merged configuration.
    ///
    /// `init` must work even when an existing config file is invalid.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

/// Parses CLI arguments, exiting with usage on error.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
