//! CLI command definitions and dispatch for the `smartbiz` binary.
//!
//! Uses clap derive macros for argument parsing. Resource commands follow a
//! noun-verb pattern (e.g. `smartbiz agent create`, `smartbiz business show`).

pub mod agent;
pub mod business;
pub mod chat;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Run and talk to SmartBiz business agents.
#[derive(Parser)]
#[command(name = "smartbiz", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "SMARTBIZ_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Log one JSON object per event.
        #[arg(long)]
        log_json: bool,
    },

    /// Manage business profiles.
    Business {
        #[command(subcommand)]
        action: BusinessCommand,
    },

    /// Manage agents.
    Agent {
        #[command(subcommand)]
        action: AgentCommand,
    },

    /// Send one message to an agent and print the reply.
    Chat {
        /// Agent ID.
        agent: String,

        /// Message text. May be omitted when an image is attached.
        message: Option<String>,

        /// Attach an image file to the turn.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Reply with memory profile and recent history instead of routing.
        #[arg(long, conflicts_with = "image")]
        context: bool,
    },

    /// Show an agent's conversation log.
    History {
        /// Agent ID.
        agent: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BusinessCommand {
    /// Create a business profile.
    Create {
        /// Business name.
        #[arg(long)]
        name: String,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Who the business sells to.
        #[arg(long)]
        audience: Option<String>,

        /// Brand voice, e.g. "warm" or "playful".
        #[arg(long)]
        tone: Option<String>,
    },

    /// Show a business profile.
    Show {
        /// Business ID.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Create an agent, optionally bound to a business.
    Create {
        /// Agent display name.
        #[arg(long)]
        name: String,

        /// Business ID whose profile seeds the agent's memory.
        #[arg(long)]
        business: Option<String>,
    },

    /// Show an agent and its memory profile.
    Show {
        /// Agent ID.
        id: String,
    },

    /// List the agents of a business.
    #[command(alias = "ls")]
    List {
        /// Business ID.
        #[arg(long)]
        business: String,
    },

    /// Delete an agent and its history.
    #[command(alias = "rm")]
    Delete {
        /// Agent ID.
        id: String,
    },
}

/// Parse an ID argument with a readable error.
pub fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> anyhow::Result<T> {
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("invalid {what} id: {raw}"))
}
