//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for dispatch results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Text,
    /// The full execution result as JSON
    Json,
}

/// CLI arguments for switchyard
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(author, version, about = "Configuration-driven multi-agent dispatcher")]
#[command(long_about = r#"
Switchyard routes each request to one of the agents declared in the agent
manifest, or fans it out to several agents and synthesizes a comparison.

Agents and tools are declared in two JSON manifests (tools.json, agents.json)
and can be reloaded without restarting.

Configuration files are loaded from (in priority order):
1. SWITCHYARD_* environment variables (e.g. SWITCHYARD_DISPATCH__MAX_ROUTER_ITERATIONS=3)
2. --config <path>     Explicit config file
3. ./switchyard.toml   Project-level config
4. ~/.config/switchyard/config.toml   Global config

Example:
  switchyard ask "Chính sách nghỉ phép như thế nào?"
  switchyard ask --detailed --output json "So sánh mô hình FNB và Booking"
  switchyard chat --watch
  switchyard check
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dispatch a single message and print the response
    Ask {
        /// The message to dispatch
        message: String,

        /// Keep full tool observations in the trace and print it
        #[arg(short, long)]
        detailed: bool,

        /// Output format (defaults to `[output] format`)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Start an interactive chat session
    Chat {
        /// Reload manifests automatically when the files change
        #[arg(short, long)]
        watch: bool,
    },

    /// List the assembled agents
    Agents,

    /// List the tools declared in the tool manifest
    Tools,

    /// Validate the configuration and manifests without calling the decision service
    Check,
}
