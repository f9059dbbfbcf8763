use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::{OutputFormat, Runtime};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Register remote server")]
    Add {
        #[arg(help = "Server name")]
        name: String,
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "List registered servers")]
    List,

    #[command(about = "Show currently selected server")]
    Current,

    #[command(about = "Switch to server (persistent selection)")]
    Use {
        #[arg(help = "Server name to switch to")]
        name: String,
    },

    #[command(about = "Remove server from registry")]
    Delete {
        #[arg(help = "Server name to delete")]
        name: String,
    },

    #[command(about = "Check that a server answers (defaults to current server)")]
    Ping {
        #[arg(help = "Server name to ping")]
        name: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, runtime: &Runtime, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Add { name, url } => {
            let mut state = load_cli_state()?;
            if state.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' already exists", name));
            }

            let entry = ServerEntry::new(url);
            url::Url::parse(&entry.url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", entry.url, e))?;
            let url = entry.url.clone();

            state.servers.insert(name.clone(), entry);
            if state.current_server.is_none() {
                state.current_server = Some(name.clone());
            }
            save_cli_state(&state)?;

            output_success(
                &output_format,
                &format!("Server '{}' added ({})", name, url),
                Some(json!({ "server": name, "url": url })),
            )
        }
        ServerCommands::List => {
            let state = load_cli_state()?;

            if state.servers.is_empty() {
                return output_empty_collection(&output_format, "servers", "No servers registered");
            }

            match output_format {
                OutputFormat::Json => {
                    let servers: Vec<_> = state
                        .servers
                        .iter()
                        .map(|(name, entry)| {
                            json!({
                                "name": name,
                                "url": entry.url,
                                "status": entry.status,
                                "added_at": entry.added_at,
                                "last_ping": entry.last_ping,
                                "current": state.current_server.as_ref() == Some(name)
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "servers": servers }))?);
                }
                OutputFormat::Text => {
                    println!("{:<15} {:<35} {:<8} {}", "NAME", "URL", "STATUS", "ADDED");
                    println!("{}", "-".repeat(80));

                    for (name, entry) in &state.servers {
                        let current_marker = if state.current_server.as_ref() == Some(name) { "*" } else { " " };
                        let status = match entry.status {
                            ServerStatus::Up => "up",
                            ServerStatus::Down => "down",
                            ServerStatus::Unknown => "unknown",
                        };
                        println!(
                            "{}{:<14} {:<35} {:<8} {}",
                            current_marker,
                            name,
                            entry.url,
                            status,
                            entry.added_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }

            Ok(())
        }
        ServerCommands::Current => {
            let state = load_cli_state()?;
            let (name, url) = match state.current() {
                Some((name, entry)) => (Some(name.to_string()), entry.url.clone()),
                None => (None, runtime.config.api.base_url.clone()),
            };

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "current_server": name,
                        "url": url,
                        "in_use": runtime.base_url
                    }))?);
                }
                OutputFormat::Text => {
                    match name {
                        Some(name) => println!("Current server: {} ({})", name, url),
                        None => println!("No current server set, using configured default {}", url),
                    }
                    if runtime.base_url != url {
                        println!("This command was pointed at {}", runtime.base_url);
                    }
                }
            }

            Ok(())
        }
        ServerCommands::Use { name } => {
            let mut state = load_cli_state()?;
            if !state.servers.contains_key(&name) {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }

            state.current_server = Some(name.clone());
            save_cli_state(&state)?;

            output_success(
                &output_format,
                &format!("Switched to server '{}'", name),
                Some(json!({ "current_server": name })),
            )
        }
        ServerCommands::Delete { name } => {
            let mut state = load_cli_state()?;
            if state.servers.remove(&name).is_none() {
                return Err(anyhow::anyhow!("Server '{}' not found", name));
            }
            if state.current_server.as_deref() == Some(name.as_str()) {
                state.current_server = None;
            }
            save_cli_state(&state)?;

            output_success(&output_format, &format!("Server '{}' deleted", name), None)
        }
        ServerCommands::Ping { name } => {
            let mut state = load_cli_state()?;

            let target = match name.or_else(|| state.current_server.clone()) {
                Some(name) => name,
                None => {
                    // Nothing registered: ping whatever this command talks to
                    let entry = ServerEntry::new(runtime.base_url.clone());
                    let status = ping_server(&entry, &runtime.config.api).await;
                    return report_ping(&output_format, &entry.url, status);
                }
            };

            let entry = state
                .servers
                .get_mut(&target)
                .ok_or_else(|| anyhow::anyhow!("Server '{}' not found", target))?;
            let status = ping_server(entry, &runtime.config.api).await;
            entry.update_ping(status);
            let url = entry.url.clone();
            save_cli_state(&state)?;

            report_ping(&output_format, &url, status)
        }
    }
}

fn report_ping(output_format: &OutputFormat, url: &str, status: ServerStatus) -> anyhow::Result<()> {
    match status {
        ServerStatus::Up => output_success(
            output_format,
            &format!("{} is up", url),
            Some(json!({ "url": url, "status": status })),
        ),
        _ => {
            let message = format!("{} is not responding", url);
            if let OutputFormat::Json = output_format {
                output_error(output_format, &message, Some("SERVER_DOWN"))?;
            }
            Err(anyhow::anyhow!(message))
        }
    }
}
