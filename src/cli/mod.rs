pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::{FileCredentialStore, SessionResolver};
use crate::views::ViewContext;

#[derive(Parser)]
#[command(name = "mtrack")]
#[command(about = "Track movies, shows and novels against a media tracker server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL for this command (overrides the current server)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Remote server management")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Login, registration and the stored session")]
    Session {
        #[command(subcommand)]
        cmd: commands::session::SessionCommands,
    },

    #[command(about = "Tracked movies, shows and novels")]
    Media {
        #[command(subcommand)]
        cmd: commands::media::MediaCommands,
    },

    #[command(about = "Your profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Discussion forum")]
    Forum {
        #[command(subcommand)]
        cmd: commands::forum::ForumCommands,
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

/// Per-invocation wiring: which server, where the credential lives.
pub struct Runtime {
    pub config: &'static AppConfig,
    pub base_url: String,
    pub store: FileCredentialStore,
}

impl Runtime {
    /// `--server` wins, then the current saved server, then configuration
    pub fn new(server_override: Option<String>) -> anyhow::Result<Self> {
        let config = crate::config::config();
        let base_url = match server_override {
            Some(url) => url,
            None => config::load_cli_state()?
                .current()
                .map(|(_, entry)| entry.url.clone())
                .unwrap_or_else(|| config.api.base_url.clone()),
        };

        Ok(Self {
            config,
            base_url,
            store: config::credential_store()?,
        })
    }

    pub fn api(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::with_base_url(&self.base_url, &self.config.api)?)
    }

    pub fn resolver(&self) -> SessionResolver<'_> {
        SessionResolver::new(&self.store, &self.config.session)
    }

    /// The session is resolved here, once, and injected into the view
    pub fn view_context(&self) -> anyhow::Result<ViewContext> {
        let session = self.resolver().context();
        Ok(ViewContext::new(Arc::new(self.api()?), session, self.config.views.clone()))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let runtime = Runtime::new(cli.server)?;
    tracing::debug!(base_url = %runtime.base_url, "using server");

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &runtime, output_format).await,
        Commands::Session { cmd } => commands::session::handle(cmd, &runtime, output_format).await,
        Commands::Media { cmd } => commands::media::handle(cmd, &runtime, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &runtime, output_format).await,
        Commands::Forum { cmd } => commands::forum::handle(cmd, &runtime, output_format).await,
    }
}
