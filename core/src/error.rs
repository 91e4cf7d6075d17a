//! Error types for the board API client.
//!
//! # Design
//! `Network` is produced by the host when the round-trip itself failed (no
//! route, DNS, TLS). `Server` covers every non-2xx status; it carries the
//! server-supplied `message` field when the body had one. `MalformedResponse`
//! is only ever logged by the normalizer; list screens degrade to an empty
//! result instead of failing.

use thiserror::Error;

/// Result alias used across the core crate.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `BoardClient` parse methods and reported by hosts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure: the request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{}", server_message(*status, message.as_deref()))]
    Server { status: u16, message: Option<String> },

    /// The response body had a shape the normalizer does not recognise.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

fn server_message(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("HTTP error! status: {status}"),
    }
}

impl ApiError {
    /// Build a `Network` error from whatever the host's transport returned.
    pub fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network(err.to_string())
    }

    /// HTTP status for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
