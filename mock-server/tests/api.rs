use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, seeded_store, ErrorBody, Page, PostDetail, PostSummary};
use tokio::sync::RwLock;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn seeded_app() -> Router {
    app_with(Arc::new(RwLock::new(seeded_store())))
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn create_request(token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/post")
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

// --- main feed ---

#[tokio::test]
async fn main_feed_empty_is_bare_array() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert_eq!(&bytes[..], b"[]");
}

#[tokio::test]
async fn main_feed_lists_newest_first() {
    let resp = seeded_app().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<PostSummary> = body_json(resp).await;
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
}

// --- board feed ---

#[tokio::test]
async fn board_feed_is_enveloped() {
    let resp = seeded_app().oneshot(get("/post")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<PostSummary> = body_json(resp).await;
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.page, 0);
    assert_eq!(page.content.len(), 2);
}

// --- detail ---

#[tokio::test]
async fn get_post_returns_detail() {
    let resp = seeded_app().oneshot(get("/post/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let post: PostDetail = body_json(resp).await;
    assert_eq!(post.title, "Welcome");
    assert_eq!(post.files.len(), 1);
    assert_eq!(post.youtubelink.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
}

#[tokio::test]
async fn get_post_not_found_has_message() {
    let resp = app().oneshot(get("/post/404")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "post not found");
}

#[tokio::test]
async fn get_post_bad_id_returns_400() {
    let resp = app().oneshot(get("/post/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "invalid post id");
}

// --- create ---

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let resp = seeded_app()
        .oneshot(create_request(None, r#"{"team":"dev","title":"t","content":"c"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "login required");
}

#[tokio::test]
async fn create_with_unknown_token_is_unauthorized() {
    let resp = seeded_app()
        .oneshot(create_request(Some("nope"), r#"{"team":"dev","title":"t","content":"c"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "invalid token");
}

#[tokio::test]
async fn create_with_token_returns_201_and_lists_it() {
    let app = seeded_app();
    let resp = app
        .clone()
        .oneshot(create_request(
            Some("test-token"),
            r#"{"team":"dev","title":"Fresh","content":"body"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostDetail = body_json(resp).await;
    assert_eq!(created.id, 3);
    assert_eq!(created.username, "tester");
    assert!(created.files.is_empty());

    let resp = app.oneshot(get("/")).await.unwrap();
    let posts: Vec<PostSummary> = body_json(resp).await;
    assert_eq!(posts[0].id, 3);
    assert_eq!(posts[0].title, "Fresh");
}

#[tokio::test]
async fn create_blank_title_returns_400() {
    let resp = seeded_app()
        .oneshot(create_request(Some("test-token"), r#"{"team":"dev","title":"  ","content":"c"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_malformed_json_returns_422() {
    let resp = seeded_app()
        .oneshot(create_request(Some("test-token"), r#"{"not_title":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorBody = body_json(resp).await;
    assert!(!body.message.is_empty());
}

#[tokio::test]
async fn create_malformed_json_without_token_is_unauthorized() {
    let resp = seeded_app()
        .oneshot(create_request(None, r#"{"not_title":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "login required");
}

#[tokio::test]
async fn create_invalid_json_syntax_has_message() {
    let resp = seeded_app()
        .oneshot(create_request(Some("test-token"), "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert!(!body.message.is_empty());
}
