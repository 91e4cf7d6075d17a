//! In-memory backend speaking the board API.
//!
//! `GET /` answers with a bare array and `GET /post` with a paginated
//! envelope, matching the two shapes the real backend mixes. Creating a post
//! needs a bearer token registered in the store.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub thumbnail_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i64,
    pub team: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub like_count: u64,
    pub view_count: u64,
    pub username: String,
    pub files: Vec<Thumbnail>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub file_name: String,
    pub download_url: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtubelink: Option<String>,
    pub liked: bool,
    pub files: Vec<Attachment>,
}

impl PostDetail {
    fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            team: self.team.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at.clone(),
            like_count: self.like_count,
            view_count: self.view_count,
            username: self.username.clone(),
            files: self
                .files
                .iter()
                .map(|f| Thumbnail {
                    thumbnail_url: f.thumbnail_url.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub team: String,
    pub title: String,
    pub content: String,
    pub youtubelink: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub page: u32,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Default)]
pub struct Store {
    posts: BTreeMap<i64, PostDetail>,
    tokens: HashMap<String, String>,
    next_id: i64,
}

impl Store {
    /// Accept `token` as a bearer credential for `username`.
    pub fn register_token(&mut self, token: &str, username: &str) {
        self.tokens.insert(token.to_string(), username.to_string());
    }

    pub fn insert(&mut self, input: CreatePost, username: &str, files: Vec<Attachment>) -> PostDetail {
        self.next_id += 1;
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        let post = PostDetail {
            id: self.next_id,
            team: input.team,
            title: input.title,
            content: input.content,
            created_at: now.clone(),
            updated_at: now,
            like_count: 0,
            view_count: 0,
            username: username.to_string(),
            youtubelink: input.youtubelink.filter(|l| !l.is_empty()),
            liked: false,
            files,
        };
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn clear(&mut self) {
        self.posts.clear();
    }

    /// Newest first.
    fn summaries(&self) -> Vec<PostSummary> {
        self.posts.values().rev().map(PostDetail::summary).collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Two posts and the `test-token` credential, for local runs and tests.
pub fn seeded_store() -> Store {
    let mut store = Store::default();
    store.register_token("test-token", "tester");
    store.insert(
        CreatePost {
            team: "notice".to_string(),
            title: "Welcome".to_string(),
            content: "First post on the board.".to_string(),
            youtubelink: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
        },
        "admin",
        vec![Attachment {
            file_name: "guide.pdf".to_string(),
            download_url: "http://localhost/files/guide.pdf".to_string(),
            thumbnail_url: Some("http://localhost/files/guide.png".to_string()),
        }],
    );
    store.insert(
        CreatePost {
            team: "dev".to_string(),
            title: "Release 1.0".to_string(),
            content: "Changelog attached.".to_string(),
            youtubelink: None,
        },
        "kim",
        Vec::new(),
    );
    store
}

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Store::default())))
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/", get(list_main))
        .route("/post", get(list_board).post(create_post))
        .route("/post/{id}", get(get_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Arc::new(RwLock::new(Store::default()))).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock board api listening");
    axum::serve(listener, app_with(db)).await
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

async fn list_main(State(db): State<Db>) -> Json<Vec<PostSummary>> {
    Json(db.read().await.summaries())
}

async fn list_board(State(db): State<Db>) -> Json<Page<PostSummary>> {
    let content = db.read().await.summaries();
    Json(Page {
        total_elements: content.len(),
        content,
        page: 0,
    })
}

async fn get_post(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PostDetail>, ApiError> {
    let Path(id) = id.map_err(|_| error(StatusCode::BAD_REQUEST, "invalid post id"))?;
    let store = db.read().await;
    store
        .posts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "post not found"))
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> Result<(StatusCode, Json<PostDetail>), ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "login required"))?;

    let mut store = db.write().await;
    let username = store
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "invalid token"))?;
    let Json(input) = payload.map_err(|rejection| error(rejection.status(), &rejection.body_text()))?;
    if input.title.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "title is required"));
    }
    let post = store.insert(input, &username, Vec::new());
    tracing::info!(id = post.id, %username, "created post");
    Ok((StatusCode::CREATED, Json(post)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case() {
        let store = seeded_store();
        let json = serde_json::to_value(&store.summaries()[0]).unwrap();
        assert_eq!(json["id"], 2);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("likeCount").is_some());
    }

    #[test]
    fn summaries_are_newest_first_and_keep_first_thumbnail() {
        let store = seeded_store();
        let summaries = store.summaries();
        assert_eq!(summaries.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(
            summaries[1].files[0].thumbnail_url.as_deref(),
            Some("http://localhost/files/guide.png")
        );
    }

    #[test]
    fn detail_omits_missing_video_link() {
        let store = seeded_store();
        let json = serde_json::to_value(&store.posts[&2]).unwrap();
        assert!(json.get("youtubelink").is_none());
        assert_eq!(json["files"], serde_json::json!([]));
    }

    #[test]
    fn create_post_rejects_missing_title() {
        let result: Result<CreatePost, _> = serde_json::from_str(r#"{"team":"t","content":"c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_video_link_is_dropped() {
        let mut store = Store::default();
        let post = store.insert(
            CreatePost {
                team: "t".to_string(),
                title: "x".to_string(),
                content: "c".to_string(),
                youtubelink: Some(String::new()),
            },
            "u",
            Vec::new(),
        );
        assert_eq!(post.id, 1);
        assert!(post.youtubelink.is_none());
    }
}
