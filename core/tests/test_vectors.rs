//! Verify normalization, video-id extraction and error mapping against the
//! JSON test vectors stored in `test-vectors/`.
//!
//! The same files are meant to be replayed by the native hosts' own test
//! suites, so both sides agree on the edge cases.

use board_core::{normalize_posts, youtube_video_id, ApiError, BoardClient, ClientConfig, HttpResponse};

fn client() -> BoardClient {
    BoardClient::new(&ClientConfig::new("http://localhost:8080"))
}

#[test]
fn normalize_test_vectors() {
    let raw = include_str!("../../test-vectors/normalize.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected: Vec<i64> = serde_json::from_value(case["expected_ids"].clone()).unwrap();

        let posts = normalize_posts(case["body"].clone());
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, expected, "{name}: normalized ids");

        // Same result through the client's parse path.
        let response = HttpResponse::new(200, case["body"].to_string());
        let parsed = client().parse_post_list(response).unwrap();
        assert_eq!(parsed, posts, "{name}: parse_post_list");
    }
}

#[test]
fn video_id_test_vectors() {
    let raw = include_str!("../../test-vectors/video_id.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let link = case["link"].as_str().unwrap();
        let expected = case["expected"].as_str();
        assert_eq!(youtube_video_id(link), expected, "{name}");
    }
}

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["status"].as_u64().unwrap() as u16,
            case["body"].as_str().unwrap(),
        );
        let err = c.parse_json(response).unwrap_err();
        assert!(matches!(err, ApiError::Server { .. }), "{name}: expected Server error");
        assert_eq!(
            err.status(),
            Some(case["expected_status"].as_u64().unwrap() as u16),
            "{name}: status"
        );
        assert_eq!(err.to_string(), case["expected_message"].as_str().unwrap(), "{name}: message");
    }
}
