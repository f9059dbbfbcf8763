//! Reading the API's response bodies.
//!
//! The server is not consistent about envelopes: collections come back bare,
//! as `{ "data": [...] }`, or keyed by resource name. Everything here accepts
//! all three.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

const MESSAGE_FIELDS: &[&str] = &["message", "error", "msg"];
const STATUS_FIELDS: &[&str] = &["message", "error", "msg", "success", "status"];

/// Peel `{ "data": ... }` or `{ "<key>": ... }` off a body
pub fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut obj) => {
            for field in ["data", key] {
                if let Some(inner) = obj.remove(field) {
                    if !inner.is_null() {
                        return unwrap_envelope(inner, key);
                    }
                }
            }
            Value::Object(obj)
        }
        other => other,
    }
}

/// Decode a collection. Entries that do not decode are skipped with a
/// warning rather than failing the whole list.
pub fn decode_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>, ClientError> {
    match unwrap_envelope(body, key) {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("skipping undecodable {} entry: {}", key, e);
                    None
                }
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(ClientError::Decode(serde::de::Error::custom(format!(
            "expected a list of {}, got {}",
            key,
            kind_of(&other)
        )))),
    }
}

/// Decode a single record; `None` when the body is only a status message
pub fn decode_record<T: DeserializeOwned>(body: Value, key: &str) -> Option<T> {
    match unwrap_envelope(body, key) {
        Value::Object(obj) if obj.keys().all(|k| STATUS_FIELDS.contains(&k.as_str())) => None,
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Pull the session credential out of a login response
pub fn extract_token(body: &Value) -> Option<String> {
    match body {
        Value::String(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
        Value::Object(obj) => ["token", "accessToken", "access_token", "jwt"]
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_str))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .or_else(|| obj.get("data").and_then(extract_token)),
        _ => None,
    }
}

/// Message to show for a failed request: the server's own words when it
/// sent any, otherwise the status line.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = message_from_value(&value) {
            return message;
        }
    }

    if !body.is_empty() && !body.starts_with('<') && !body.starts_with('{') {
        return body.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => MESSAGE_FIELDS
            .iter()
            .filter_map(|field| obj.get(*field))
            .find_map(message_from_value),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
