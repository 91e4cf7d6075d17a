//! Client core for the board app.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), normalizes feed responses,
//! and drives per-screen view state. The mobile host executes the actual
//! HTTP round-trip and renders whatever `ScreenController` says.
//!
//! # Design
//! - `BoardClient` holds only configuration and a shared `TokenStore`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `ScreenController` applies only the latest completion per screen and
//!   ignores everything after teardown.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod normalize;
pub mod token;
pub mod types;
pub mod video;

pub use client::BoardClient;
pub use config::ClientConfig;
pub use controller::{
    Alert, BoardFeed, BoardFeedController, CancellationToken, Completion, MainFeed, MainFeedController, Phase,
    PostDetailController, PostDetailScreen, Screen, ScreenController, ScreenError, Ticket, ViewState,
};
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use normalize::{normalize, normalize_posts, RawListResponse};
pub use token::{MemoryTokenStore, TokenStore, AUTH_TOKEN_KEY};
pub use types::{NewPost, Post, PostDetail, PostFile, PostThumbnail};
pub use video::youtube_video_id;
