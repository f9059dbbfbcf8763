use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::session::FileCredentialStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub url: String,
    pub added_at: DateTime<Utc>,
    pub last_ping: Option<DateTime<Utc>>,
    pub status: ServerStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
    Unknown,
}

/// Known servers and which one commands talk to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliState {
    pub servers: BTreeMap<String, ServerEntry>,
    pub current_server: Option<String>,
}

impl ServerEntry {
    pub fn new(url: String) -> Self {
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
            added_at: Utc::now(),
            last_ping: None,
            status: ServerStatus::Unknown,
        }
    }

    pub fn update_ping(&mut self, status: ServerStatus) {
        self.last_ping = Some(Utc::now());
        self.status = status;
    }
}

impl CliState {
    pub fn current(&self) -> Option<(&str, &ServerEntry)> {
        let name = self.current_server.as_deref()?;
        self.servers.get(name).map(|entry| (name, entry))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("MTRACK_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("mtrack")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cli_state() -> anyhow::Result<CliState> {
    let state_file = get_config_dir()?.join("cli.json");

    if !state_file.exists() {
        return Ok(CliState::default());
    }

    let content = fs::read_to_string(state_file)?;
    let state: CliState = serde_json::from_str(&content)?;
    Ok(state)
}

pub fn save_cli_state(state: &CliState) -> anyhow::Result<()> {
    let state_file = get_config_dir()?.join("cli.json");

    let content = serde_json::to_string_pretty(state)?;
    fs::write(state_file, content)?;
    Ok(())
}

/// Client storage holding the session credential
pub fn credential_store() -> anyhow::Result<FileCredentialStore> {
    Ok(FileCredentialStore::new(get_config_dir()?.join("storage.json")))
}

pub async fn ping_server(entry: &ServerEntry, config: &ApiConfig) -> ServerStatus {
    match ApiClient::with_base_url(&entry.url, config) {
        Ok(client) if client.ping().await => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}
