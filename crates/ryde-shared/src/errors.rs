use reqwest::StatusCode;
use thiserror::Error;

use crate::const_config::client::CLIENT_GENERIC_ERROR_MSG;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("The user has not logged in")]
pub struct NotLoggedInError;

/// Reasons the stored session was discarded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no refresh token is stored")]
    NoRefreshToken,
    #[error("stored access token is not a three part signed token")]
    InvalidAccessToken,
    #[error("session changed while the token refresh was in flight")]
    Changed,
}

/// A non-success response from the backend
///
/// The message is meant to be shown to the user as is
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Builds the user facing message from a response body.
    ///
    /// Prefers a `detail` field, then the values of a validation error
    /// mapping joined by ", ", then the raw body.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("request failed with status code: {status} and no body")
        } else {
            match serde_json::from_str::<serde_json::Value>(body) {
                Ok(value) => message_from_json(&value).unwrap_or_else(|| body.to_string()),
                Err(_) => body.to_string(),
            }
        };
        Self { status, message }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

fn message_from_json(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            if let Some(Value::String(detail)) = map.get("detail") {
                return Some(detail.clone());
            }
            let parts: Vec<String> = map.values().flat_map(flatten_messages).collect();
            if parts.is_empty() {
                Some(CLIENT_GENERIC_ERROR_MSG.to_string())
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Array(_) => {
            let parts = flatten_messages(value);
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn flatten_messages(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}
