//! List response normalization.
//!
//! # Design
//! Feed endpoints answer either with a bare JSON array or with a paginated
//! envelope whose items live under `content`. `RawListResponse` names both
//! shapes; `normalize` flattens them into one ordered `Vec`. Anything else
//! degrades to an empty list with a `warn` diagnostic so the screen shows
//! "no posts" instead of failing.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Post;

/// The two list shapes the backend produces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawListResponse<T = Post> {
    Array(Vec<T>),
    Envelope { content: Vec<T> },
}

impl<T: DeserializeOwned> RawListResponse<T> {
    /// Classify a decoded body. Unknown shapes yield `MalformedResponse`.
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        let kind = shape_name(&raw);
        serde_json::from_value(raw)
            .map_err(|e| ApiError::MalformedResponse(format!("unrecognized list shape ({kind}): {e}")))
    }
}

impl<T> RawListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            RawListResponse::Array(items) => items,
            RawListResponse::Envelope { content } => content,
        }
    }
}

/// Flatten a list body into its items, in server order.
pub fn normalize<T: DeserializeOwned>(raw: Value) -> Vec<T> {
    match RawListResponse::from_value(raw) {
        Ok(list) => list.into_items(),
        Err(err) => {
            tracing::warn!(error = %err, "treating unrecognized list response as empty");
            Vec::new()
        }
    }
}

/// `normalize` specialised to feed summaries.
pub fn normalize_posts(raw: Value) -> Vec<Post> {
    normalize(raw)
}

fn shape_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(map) if map.contains_key("content") => "envelope",
        Value::Object(_) => "object",
    }
}
