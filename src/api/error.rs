// src/api/error.rs
//! Error taxonomy for the HTTP boundary.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// Network or transport failure before a status line arrived, or a
    /// success body that could not be decoded.
    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status. The message is the most specific one the response
    /// body offered.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
}

impl RequestError {
    /// Build the error for a non-success response from its status and body.
    pub fn from_error_body(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            message: extract_error_message(status, body),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Picks the most specific message from an error body: the `detail` field,
/// then the `error` field, then a generic template. A body that is not JSON
/// (or carries neither field as a string) falls back to the template; parse
/// failure never escapes this function.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("error")))
        .and_then(|field| field.as_str())
        .map(|message| message.to_string())
        .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()))
}
