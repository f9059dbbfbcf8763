#![allow(dead_code)]

use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use media_tracker_client::api::ApiClient;
use media_tracker_client::config::{ApiConfig, AppConfig};
use media_tracker_client::session::{MemoryCredentialStore, SessionResolver};
use media_tracker_client::views::ViewContext;

/// Sign a payload the way the server would; the client never checks the key
pub fn mint_token(payload: Value) -> String {
    encode(&Header::default(), &payload, &EncodingKey::from_secret(b"integration-secret"))
        .expect("failed to sign test token")
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: Some(5),
        enable_request_logging: false,
        scope_queries: true,
    }
}

pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&api_config(base_url)).expect("failed to build api client")
}

/// A view context wired to a mock server, with `token` (if any) in storage
pub fn view_context(base_url: &str, token: Option<&str>) -> ViewContext {
    let config = AppConfig::development();
    let store = MemoryCredentialStore::new();
    if let Some(token) = token {
        media_tracker_client::session::CredentialStore::set(&store, &config.session.credential_key, token)
            .expect("memory store accepts writes");
    }
    let session = SessionResolver::new(&store, &config.session).context();
    ViewContext::new(Arc::new(client(base_url)), session, config.views)
}
