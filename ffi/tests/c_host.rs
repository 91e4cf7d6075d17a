//! Drives the C ABI the way a native host does: build a request, execute it
//! over real HTTP, hand the raw response back, read the tagged result.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::Arc;
use std::time::Duration;

use board_ffi::types::*;
use board_ffi::*;

struct RawResponse {
    status: u16,
    body: CString,
}

impl RawResponse {
    fn as_ffi(&self) -> FfiHttpResponse {
        FfiHttpResponse {
            status: self.status,
            body: self.body.as_ptr(),
        }
    }
}

fn cstr<'a>(p: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(p) }.to_str().unwrap()
}

/// Execute an `FfiHttpRequest` with ureq, the way a Swift/Kotlin shell would
/// with its platform client.
fn execute(req: *mut FfiHttpRequest) -> RawResponse {
    let req = unsafe { &*req };
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_millis(req.timeout_ms)))
        .build()
        .new_agent();

    let url = cstr(req.url);
    let headers: Vec<(String, String)> = if req.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) }
            .iter()
            .map(|h| (cstr(h.key).to_string(), cstr(h.value).to_string()))
            .collect()
    };

    let result = match req.method {
        FfiHttpMethod::Get => {
            let mut builder = agent.get(url);
            for (k, v) in &headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            builder.call()
        }
        FfiHttpMethod::Post => {
            let mut builder = agent.post(url);
            for (k, v) in &headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            if req.body.is_null() {
                builder.send_empty()
            } else {
                let body = unsafe { std::slice::from_raw_parts(req.body, req.body_len as usize) };
                builder.send(body)
            }
        }
    };
    let mut response = result.expect("transport");
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    RawResponse {
        status,
        body: CString::new(body).unwrap(),
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let store = Arc::new(tokio::sync::RwLock::new(mock_server::seeded_store()));
            mock_server::run_with(listener, store).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn new_client(base_url: &str) -> *mut FfiBoardClient {
    let url = CString::new(base_url).unwrap();
    let client = board_client_new(url.as_ptr(), 2_000);
    assert!(!client.is_null());
    client
}

#[test]
fn feeds_and_detail_over_http() {
    let client = new_client(&start_server());

    let req = board_build_main_feed(client);
    let resp = execute(req);
    board_free_request(req);
    let result = board_parse_post_list(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let list = unsafe { &*(r.data as *const FfiPostList) };
    assert_eq!(list.len, 2);
    let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
    assert_eq!(cstr(items[0].title), "Release 1.0");
    assert_eq!(cstr(items[1].thumbnail_url), "http://localhost/files/guide.png");
    board_free_result(result);

    let req = board_build_board_list(client);
    let resp = execute(req);
    board_free_request(req);
    let result = board_parse_post_list(client, &resp.as_ffi());
    let list = unsafe { &*((*result).data as *const FfiPostList) };
    assert_eq!(list.len, 2);
    board_free_result(result);

    let req = board_build_post_detail(client, 1);
    let resp = execute(req);
    board_free_request(req);
    let result = board_parse_post_detail(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let detail = unsafe { &*(r.data as *const FfiPostDetail) };
    assert_eq!(cstr(detail.title), "Welcome");
    assert_eq!(cstr(detail.video_id), "dQw4w9WgXcQ");
    assert_eq!(detail.files_len, 1);
    board_free_result(result);

    board_client_free(client);
}

#[test]
fn missing_post_reports_server_error() {
    let client = new_client(&start_server());

    let req = board_build_post_detail(client, 999);
    let resp = execute(req);
    board_free_request(req);
    let result = board_parse_post_detail(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Server);
    assert_eq!(r.http_status, 404);
    assert_eq!(cstr(r.error_message), "post not found");
    board_free_result(result);

    board_client_free(client);
}

#[test]
fn create_post_requires_token() {
    let client = new_client(&start_server());
    let team = CString::new("dev").unwrap();
    let title = CString::new("From C").unwrap();
    let content = CString::new("hello").unwrap();

    let req = board_build_create_post(client, team.as_ptr(), title.as_ptr(), content.as_ptr(), std::ptr::null());
    let resp = execute(req);
    board_free_request(req);
    let result = board_parse_create_post(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Server);
    assert_eq!(r.http_status, 401);
    board_free_result(result);

    let token = CString::new("test-token").unwrap();
    assert!(board_client_set_token(client, token.as_ptr()));
    let req = board_build_create_post(client, team.as_ptr(), title.as_ptr(), content.as_ptr(), std::ptr::null());
    let resp = execute(req);
    board_free_request(req);
    assert_eq!(resp.status, 201);
    let result = board_parse_create_post(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    assert_eq!(r.data_tag, FfiDataTag::Json);
    let created: serde_json::Value = serde_json::from_str(cstr(r.data as *const c_char)).unwrap();
    assert_eq!(created["title"], "From C");
    assert_eq!(created["username"], "tester");
    board_free_result(result);

    board_client_free(client);
}

fn run_ticket(ticket: *mut FfiTicket) -> (u64, RawResponse) {
    let t = unsafe { &*ticket };
    let resp = execute(t.request);
    let seq = t.seq;
    board_free_ticket(ticket);
    (seq, resp)
}

fn item_ids(screen: *const FfiScreenController) -> Vec<i64> {
    let list = board_screen_items(screen);
    let l = unsafe { &*list };
    let ids = if l.items.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(l.items, l.len as usize) }
            .iter()
            .map(|p| p.id)
            .collect()
    };
    board_free_post_list(list);
    ids
}

#[test]
fn board_screen_overlapping_refreshes_keep_latest() {
    let base = start_server();
    let client = new_client(&base);
    let screen = board_screen_new(FfiScreenKind::BoardFeed, 0);

    let (seq, resp) = run_ticket(board_screen_mount(screen, client));
    assert_eq!(
        board_screen_complete(screen, client, seq, &resp.as_ffi(), std::ptr::null()),
        FfiCompletion::Applied
    );
    assert_eq!(board_screen_phase(screen), FfiPhase::Loaded);
    assert_eq!(item_ids(screen), vec![2, 1]);

    let first = board_screen_refresh(screen, client);
    let second = board_screen_refresh(screen, client);
    assert_eq!(board_screen_phase(screen), FfiPhase::Refreshing);
    assert_eq!(item_ids(screen), vec![2, 1]);

    // A post lands between the two round-trips, so only the second sees it.
    let (first_seq, first_resp) = run_ticket(first);
    let token = CString::new("test-token").unwrap();
    assert!(board_client_set_token(client, token.as_ptr()));
    let team = CString::new("dev").unwrap();
    let title = CString::new("Third").unwrap();
    let content = CString::new("c").unwrap();
    let req = board_build_create_post(client, team.as_ptr(), title.as_ptr(), content.as_ptr(), std::ptr::null());
    assert_eq!(execute(req).status, 201);
    board_free_request(req);
    let (second_seq, second_resp) = run_ticket(second);
    assert!(second_seq > first_seq);

    assert_eq!(
        board_screen_complete(screen, client, second_seq, &second_resp.as_ffi(), std::ptr::null()),
        FfiCompletion::Applied
    );
    assert_eq!(
        board_screen_complete(screen, client, first_seq, &first_resp.as_ffi(), std::ptr::null()),
        FfiCompletion::Stale
    );
    assert_eq!(board_screen_phase(screen), FfiPhase::Loaded);
    assert_eq!(item_ids(screen), vec![3, 2, 1]);
    assert!(board_screen_take_alert(screen).is_null());

    board_screen_unmount(screen);
    assert!(!board_screen_is_mounted(screen));
    board_screen_free(screen);
    board_client_free(client);
}

#[test]
fn detail_screen_missing_post_raises_alert() {
    let client = new_client(&start_server());
    let screen = board_screen_new(FfiScreenKind::PostDetail, 999);

    let (seq, resp) = run_ticket(board_screen_mount(screen, client));
    assert_eq!(resp.status, 404);
    assert_eq!(
        board_screen_complete(screen, client, seq, &resp.as_ffi(), std::ptr::null()),
        FfiCompletion::Applied
    );
    assert_eq!(board_screen_phase(screen), FfiPhase::Error);
    assert!(board_screen_post(screen).is_null());

    let alert = board_screen_take_alert(screen);
    assert_eq!(cstr(unsafe { &*alert }.message), "post not found");
    board_free_alert(alert);

    board_screen_free(screen);
    board_client_free(client);
}

#[test]
fn raw_post_reaches_server() {
    let client = new_client(&start_server());
    let token = CString::new("test-token").unwrap();
    assert!(board_client_set_token(client, token.as_ptr()));

    let path = CString::new("/post").unwrap();
    let content_type = CString::new("application/json").unwrap();
    let payload = br#"{"team":"dev","title":"Raw","content":"bytes"}"#;
    let req = board_build_post_raw(
        client,
        path.as_ptr(),
        content_type.as_ptr(),
        payload.as_ptr(),
        payload.len() as u32,
    );
    let resp = execute(req);
    board_free_request(req);
    assert_eq!(resp.status, 201);

    let result = board_parse_create_post(client, &resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let created: serde_json::Value = serde_json::from_str(cstr(r.data as *const c_char)).unwrap();
    assert_eq!(created["title"], "Raw");
    board_free_result(result);

    board_client_free(client);
}
