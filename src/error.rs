// Client-side error types for calls against the media tracker API
use thiserror::Error;

use crate::session::SessionError;

/// Everything a view can trip over while talking to the API.
///
/// None of these are fatal: views turn them into an inline message.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response (connection refused, DNS, timeout)
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response, with the server-provided message when there was one
    #[error("{message}")]
    Application { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A write endpoint needs a bearer token and the session has none
    #[error("You need to be logged in to do that")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    pub fn application(status: u16, message: impl Into<String>) -> Self {
        ClientError::Application {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// HTTP status code, when the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Application { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get error code for scripted consumers of the CLI
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_FAILURE",
            ClientError::Application { .. } => "APPLICATION_ERROR",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Unauthenticated => "UNAUTHENTICATED",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Session(SessionError::NoCredential) => "NO_CREDENTIAL",
            ClientError::Session(SessionError::InvalidCredential(_)) => "INVALID_CREDENTIAL",
            ClientError::Session(SessionError::Storage(_)) => "STORAGE_ERROR",
        }
    }

    /// True for 401/403 responses, which usually mean the stored token went stale
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }
}
