//! Domain DTOs for the board API.
//!
//! # Design
//! These types mirror the backend's JSON (camelCase) but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. Timestamps stay as the server's strings and are only interpreted
//! for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::video;

/// Attachment reference carried by list summaries. Only the preview matters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostThumbnail {
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// A post as it appears in a feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub team: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub like_count: u64,
    pub view_count: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PostThumbnail>,
}

impl Post {
    /// Card preview: the first file's thumbnail, if it has one.
    pub fn preview_thumbnail(&self) -> Option<&str> {
        self.files
            .first()
            .and_then(|f| f.thumbnail_url.as_deref())
            .filter(|u| !u.is_empty())
    }

    pub fn created_date(&self) -> Option<String> {
        display_date(&self.created_at)
    }
}

/// A downloadable attachment on the detail screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostFile {
    pub file_name: String,
    pub download_url: String,
    pub thumbnail_url: Option<String>,
}

impl PostFile {
    pub fn download_label(&self) -> String {
        format!("{} 다운로드", self.file_name)
    }
}

/// Full post returned by `GET /post/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: i64,
    pub team: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub like_count: u64,
    pub view_count: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtubelink: Option<String>,
    #[serde(default)]
    pub liked: bool,
    pub files: Vec<PostFile>,
}

impl PostDetail {
    /// Embeddable video id derived from `youtubelink`.
    pub fn video_id(&self) -> Option<&str> {
        self.youtubelink.as_deref().and_then(video::youtube_video_id)
    }

    pub fn created_date(&self) -> Option<String> {
        display_date(&self.created_at)
    }

    /// Files that have an image preview, in server order.
    pub fn thumbnails(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter_map(|f| f.thumbnail_url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Request payload for creating a post. `youtubelink` is omitted when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub team: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtubelink: Option<String>,
}

/// `YYYY.MM.DD` for an ISO-8601 timestamp, with or without an offset.
pub fn display_date(timestamp: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(timestamp, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%Y.%m.%d").to_string())
}
