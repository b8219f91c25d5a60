//! CLI module for walletwatch
//!
//! Command-line interface definitions and handlers for the wallet analysis
//! stream monitor.
//!
//! # Commands
//!
//! - `watch` - Subscribe to a live analysis stream and display events
//! - `status` - Probe the analysis API status endpoint
//! - `replay` - Classify recorded frames offline
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch a buy analysis on Base with defaults
//! walletwatch watch
//!
//! # Watch a sell analysis on Ethereum over the last 3 days
//! walletwatch watch --network ethereum --direction sell --days-back 3
//!
//! # Replay captured frames from a file
//! walletwatch replay frames.jsonl
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod replay;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// walletwatch - real-time smart-wallet analysis stream monitor
#[derive(Parser, Debug)]
#[command(
    name = "walletwatch",
    version,
    about = "Real-time smart-wallet analysis stream monitor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Subscribe to a live analysis stream and display events
    Watch(WatchArgs),
    /// Probe the analysis API status endpoint
    Status(StatusArgs),
    /// Classify recorded stream frames offline
    Replay(ReplayArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "walletwatch.toml")]
    pub config: PathBuf,

    /// Target network (ethereum, base)
    #[arg(short, long, env = "WALLETWATCH_NETWORK")]
    pub network: Option<String>,

    /// Analysis direction (buy, sell)
    #[arg(short, long, env = "WALLETWATCH_DIRECTION")]
    pub direction: Option<String>,

    /// Number of tracked wallets to analyze
    #[arg(short, long)]
    pub wallets: Option<u32>,

    /// Analysis time window in days
    #[arg(long)]
    pub days_back: Option<f64>,

    /// Full stream URL, overriding the URL built from config
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Skip the API status preflight check
    #[arg(long)]
    pub no_preflight: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WALLETWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Set log format (pretty, json)
    #[arg(long, env = "WALLETWATCH_LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "walletwatch.toml")]
    pub config: PathBuf,

    /// Base URL of the analysis API, overriding config
    #[arg(long, env = "WALLETWATCH_BASE_URL")]
    pub base_url: Option<String>,

    /// Output as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File of newline-delimited frames, or '-' for stdin
    pub input: PathBuf,

    /// Output records as JSON lines instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "walletwatch.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
