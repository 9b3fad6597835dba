pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::HttpProjectClient;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "projector")]
#[command(about = "Projector CLI - Command-line client for the Projector API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "PROJECTOR_URL", help = "API server URL")]
    pub server: Option<String>,

    #[arg(long, global = true, env = "PROJECTOR_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Development token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Show the user the current token belongs to")]
    Whoami,

    #[command(about = "Project operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Local persistent counter")]
    Counter {
        #[command(subcommand)]
        cmd: commands::counter::CounterCommands,
    },

    #[command(about = "Saved CLI settings")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Server and token for this invocation: flags/env first, then the saved config
#[derive(Debug, Clone)]
pub struct Connection {
    pub server: String,
    pub token: Option<String>,
}

impl Connection {
    pub fn resolve(server: Option<String>, token: Option<String>) -> anyhow::Result<Self> {
        let saved = config::load_cli_config()?;
        Ok(Self {
            server: server
                .or(saved.server)
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            token: token.or(saved.token),
        })
    }

    pub fn client(&self) -> anyhow::Result<HttpProjectClient> {
        Ok(HttpProjectClient::new(&self.server, self.token.clone())?)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { cmd } => commands::token::handle(cmd, output_format).await,
        Commands::Whoami => {
            let connection = Connection::resolve(cli.server, cli.token)?;
            commands::token::whoami(&connection, output_format).await
        }
        Commands::Project { cmd } => {
            let connection = Connection::resolve(cli.server, cli.token)?;
            commands::project::handle(cmd, &connection, output_format).await
        }
        Commands::Counter { cmd } => commands::counter::handle(cmd, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
    }
}
