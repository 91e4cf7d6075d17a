//! Stateless HTTP request builder and response parser for the board API.
//!
//! # Design
//! `BoardClient` holds the configured base URL and timeout plus a shared
//! handle to the token store; it carries no per-call state. Each endpoint is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and free of I/O.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::normalize;
use crate::token::{MemoryTokenStore, TokenStore};
use crate::types::{NewPost, Post, PostDetail};

pub const MAIN_FEED_PATH: &str = "/";
pub const BOARD_PATH: &str = "/post";

/// Request builder / response parser for the board backend.
#[derive(Clone)]
pub struct BoardClient {
    base_url: String,
    timeout_ms: u64,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for BoardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("tokens", &"<redacted>")
            .finish()
    }
}

impl BoardClient {
    /// Client backed by an in-memory token store.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_token_store(config, Arc::new(MemoryTokenStore::default()))
    }

    pub fn with_token_store(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.request_timeout_ms,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // -----------------------------------------------------------------------
    // Generic builders
    // -----------------------------------------------------------------------

    pub fn build_get(&self, path: &str) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        self.attach_auth(&mut headers);
        self.request(HttpMethod::Get, path, headers, None)
    }

    /// POST with a JSON-serialized body.
    pub fn build_post_json<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build_post(path, RequestBody::Json(body)))
    }

    /// POST forwarding a pre-encoded payload (e.g. multipart form data) as is.
    pub fn build_post_raw(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> HttpRequest {
        self.build_post(
            path,
            RequestBody::Raw {
                content_type: content_type.to_string(),
                bytes,
            },
        )
    }

    fn build_post(&self, path: &str, body: RequestBody) -> HttpRequest {
        let mut headers = Vec::new();
        self.attach_auth(&mut headers);
        headers.push(("content-type".to_string(), body.content_type().to_string()));
        self.request(HttpMethod::Post, path, headers, Some(body))
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: Vec<(String, String)>,
        body: Option<RequestBody>,
    ) -> HttpRequest {
        let url = self.url(path);
        tracing::debug!(method = method.as_str(), %url, "built request");
        HttpRequest {
            method,
            url,
            headers,
            body,
            timeout_ms: self.timeout_ms,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn attach_auth(&self, headers: &mut Vec<(String, String)>) {
        if let Some(token) = self.tokens.auth_token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
    }

    // -----------------------------------------------------------------------
    // Endpoint builders
    // -----------------------------------------------------------------------

    pub fn build_main_feed(&self) -> HttpRequest {
        self.build_get(MAIN_FEED_PATH)
    }

    pub fn build_board_list(&self) -> HttpRequest {
        self.build_get(BOARD_PATH)
    }

    pub fn build_post_detail(&self, id: i64) -> HttpRequest {
        self.build_get(&format!("{BOARD_PATH}/{id}"))
    }

    pub fn build_create_post(&self, input: &NewPost) -> ApiResult<HttpRequest> {
        self.build_post_json(BOARD_PATH, input)
    }

    // -----------------------------------------------------------------------
    // Parsers
    // -----------------------------------------------------------------------

    /// Decode a response body, failing with `Server` on non-2xx statuses.
    pub fn parse_json(&self, response: HttpResponse) -> ApiResult<Value> {
        let parsed = if response.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&response.body)
        };

        if !response.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let err = ApiError::Server {
                status: response.status,
                message,
            };
            tracing::warn!(status = response.status, error = %err, "server returned an error status");
            return Err(err);
        }

        parsed.map_err(|e| {
            tracing::warn!(status = response.status, error = %e, "response body is not JSON");
            ApiError::Deserialization(e.to_string())
        })
    }

    /// Decode a 2xx body into `T`.
    pub fn parse_as<T: DeserializeOwned>(&self, response: HttpResponse) -> ApiResult<T> {
        let value = self.parse_json(response)?;
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Feed responses, normalized from either list shape.
    pub fn parse_post_list(&self, response: HttpResponse) -> ApiResult<Vec<Post>> {
        let value = self.parse_json(response)?;
        let posts = normalize::normalize_posts(value);
        tracing::debug!(count = posts.len(), "parsed post list");
        Ok(posts)
    }

    pub fn parse_post_detail(&self, response: HttpResponse) -> ApiResult<PostDetail> {
        self.parse_as(response)
    }

    /// Create answers vary by backend version, so the raw JSON is returned.
    pub fn parse_create_post(&self, response: HttpResponse) -> ApiResult<Value> {
        self.parse_json(response)
    }
}
