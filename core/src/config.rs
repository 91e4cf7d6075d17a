//! Client configuration injected by the host at startup.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Where the backend lives and how long the host should wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Parse and validate a JSON config blob, e.g. one bundled with the app.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        let config: ClientConfig =
            serde_json::from_str(raw).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The base URL must be absolute http(s) and the timeout non-zero.
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Deserialization(format!("invalid base url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Deserialization(format!(
                "unsupported base url scheme: {}",
                url.scheme()
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ApiError::Deserialization(
                "requestTimeoutMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
