//! C-ABI wrapper around `board-core`.
//!
//! # Overview
//! Exposes the board API's request builders and response parsers through
//! `extern "C"` functions so the iOS and Android shells can build and parse
//! HTTP requests/responses without linking serde or the regex engine
//! themselves.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-endpoint `build_*` / `parse_*` mirrors the core API 1:1.
//! - `board_screen_*` wraps one `ScreenController` per screen instance
//!   behind an opaque handle; tickets carry the sequence number the host
//!   reports back through `board_screen_complete`.
//! - A single `FfiBoardResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `board_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use board_core::{ApiError, ClientConfig, HttpResponse, NewPost, TokenStore, AUTH_TOKEN_KEY};

use types::*;

/// Borrow a caller-supplied identifier as UTF-8. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `s` must be non-null and NUL-terminated.
unsafe fn read_str<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

unsafe fn read_opt_string(s: *const c_char) -> Option<String> {
    if s.is_null() {
        None
    } else {
        Some(unsafe { read_str(s) }.to_string())
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `BoardClient` bound to `base_url`.
///
/// `timeout_ms` of 0 selects the default timeout. Returns null if `base_url`
/// is null or not an absolute http(s) URL, or if an internal panic occurs.
/// The caller must free the returned pointer with `board_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn board_client_new(base_url: *const c_char, timeout_ms: u64) -> *mut FfiBoardClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_str(base_url) };
        let mut config = ClientConfig::new(url);
        if timeout_ms > 0 {
            config = config.with_timeout_ms(timeout_ms);
        }
        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "rejecting client configuration");
            return std::ptr::null_mut();
        }
        let client = board_core::BoardClient::new(&config);
        Box::into_raw(Box::new(FfiBoardClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `BoardClient` created by `board_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_client_free(client: *mut FfiBoardClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Store the session token attached as `Authorization: Bearer` from now on.
///
/// Returns false if either argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn board_client_set_token(client: *const FfiBoardClient, token: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || token.is_null() {
            return false;
        }
        let client = unsafe { &*client };
        let token = unsafe { read_str(token) }.to_string();
        client.inner.token_store().set(AUTH_TOKEN_KEY, token);
        true
    }))
    .unwrap_or(false)
}

/// Forget the session token (logout). Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_client_clear_token(client: *const FfiBoardClient) {
    if client.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let client = unsafe { &*client };
        client.inner.token_store().remove(AUTH_TOKEN_KEY);
    }));
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for the main feed (`GET /`).
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `board_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn board_build_main_feed(client: *const FfiBoardClient) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_main_feed())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for the board listing (`GET /post`).
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn board_build_board_list(client: *const FfiBoardClient) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_board_list())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for a single post (`GET /post/{id}`).
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn board_build_post_detail(client: *const FfiBoardClient, post_id: i64) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_post_detail(post_id))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request creating a post (`POST /post`).
///
/// `youtubelink` may be null. Returns null if `client`, `team`, `title` or
/// `content` is null, or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn board_build_create_post(
    client: *const FfiBoardClient,
    team: *const c_char,
    title: *const c_char,
    content: *const c_char,
    youtubelink: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || team.is_null() || title.is_null() || content.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let input = NewPost {
            team: unsafe { read_str(team) }.to_string(),
            title: unsafe { read_str(title) }.to_string(),
            content: unsafe { read_str(content) }.to_string(),
            youtubelink: unsafe { read_opt_string(youtubelink) }.filter(|l| !l.is_empty()),
        };
        match client.inner.build_create_post(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(err) => {
                tracing::warn!(error = %err, "failed to build create request");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build a POST forwarding `body` unmodified with `content_type`, e.g. a
/// multipart form the host encoded itself.
///
/// `body` may be null when `body_len` is 0. Returns null if `client`, `path`
/// or `content_type` is null.
#[unsafe(no_mangle)]
pub extern "C" fn board_build_post_raw(
    client: *const FfiBoardClient,
    path: *const c_char,
    content_type: *const c_char,
    body: *const u8,
    body_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || path.is_null() || content_type.is_null() || (body.is_null() && body_len > 0) {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let bytes = if body.is_null() {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(body, body_len as usize) }.to_vec()
        };
        let req = client
            .inner
            .build_post_raw(unsafe { read_str(path) }, unsafe { read_str(content_type) }, bytes);
        FfiHttpRequest::from_core(req)
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty; invalid UTF-8 is replaced, not dropped.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse::new(resp.status, body)
}

/// Shared null checks and panic guard for the parse entry points.
fn parse_with(
    name: &'static str,
    client: *const FfiBoardClient,
    response: *const FfiHttpResponse,
    f: impl FnOnce(&board_core::BoardClient, HttpResponse) -> *mut FfiBoardResult,
) -> *mut FfiBoardResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiBoardResult::null_arg("client");
        }
        if response.is_null() {
            return FfiBoardResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        f(&client.inner, ffi_response_to_core(resp))
    }))
    .unwrap_or_else(|_| FfiBoardResult::panic(&format!("panic in {name}")))
}

/// Parse a feed response (either endpoint, either list shape).
///
/// Returns a result with `data_tag = PostList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn board_parse_post_list(
    client: *const FfiBoardClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBoardResult {
    parse_with("board_parse_post_list", client, response, |c, resp| {
        match c.parse_post_list(resp) {
            Ok(posts) => FfiBoardResult::ok_post_list(posts),
            Err(e) => FfiBoardResult::from_error(e),
        }
    })
}

/// Parse a post-detail response.
///
/// Returns a result with `data_tag = PostDetail` on success.
#[unsafe(no_mangle)]
pub extern "C" fn board_parse_post_detail(
    client: *const FfiBoardClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBoardResult {
    parse_with("board_parse_post_detail", client, response, |c, resp| {
        match c.parse_post_detail(resp) {
            Ok(post) => FfiBoardResult::ok_post_detail(post),
            Err(e) => FfiBoardResult::from_error(e),
        }
    })
}

/// Parse a create-post response.
///
/// Returns a result with `data_tag = Json` on success.
#[unsafe(no_mangle)]
pub extern "C" fn board_parse_create_post(
    client: *const FfiBoardClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBoardResult {
    parse_with("board_parse_create_post", client, response, |c, resp| {
        match c.parse_create_post(resp) {
            Ok(value) => FfiBoardResult::ok_json(&value),
            Err(e) => FfiBoardResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// Embeddable video id for `link`, or null when it is not a video link.
///
/// Free the returned string with `board_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn board_youtube_video_id(link: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if link.is_null() {
            return std::ptr::null_mut();
        }
        let link = unsafe { read_str(link) };
        c_string_opt(board_core::youtube_video_id(link))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Screen controllers
// ---------------------------------------------------------------------------

/// Create the view-state controller for one screen instance.
///
/// `post_id` is only read for `FfiScreenKind::PostDetail`.
/// Free the handle with `board_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_new(kind: FfiScreenKind, post_id: i64) -> *mut FfiScreenController {
    catch_unwind(|| Box::into_raw(Box::new(FfiScreenController::new(kind, post_id)))).unwrap_or(std::ptr::null_mut())
}

/// Free a screen handle. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_free(screen: *mut FfiScreenController) {
    if !screen.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(screen) });
        }));
    }
}

fn issue_ticket(
    screen: *mut FfiScreenController,
    client: *const FfiBoardClient,
    f: impl FnOnce(&mut ScreenHandle, &board_core::BoardClient) -> Option<board_core::Ticket>,
) -> *mut FfiTicket {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || client.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        let client = unsafe { &*client };
        match f(&mut screen.inner, &client.inner) {
            Some(ticket) => FfiTicket::from_core(ticket),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// First load of the screen. Returns null when already mounted or torn down.
/// Free the ticket with `board_free_ticket`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_mount(
    screen: *mut FfiScreenController,
    client: *const FfiBoardClient,
) -> *mut FfiTicket {
    issue_ticket(screen, client, |handle, client| {
        types::with_screen!(handle, c => c.mount(client))
    })
}

/// Pull-to-refresh. The returned ticket supersedes every earlier one.
/// Returns null before mount and after teardown.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_refresh(
    screen: *mut FfiScreenController,
    client: *const FfiBoardClient,
) -> *mut FfiTicket {
    issue_ticket(screen, client, |handle, client| {
        types::with_screen!(handle, c => c.refresh(client))
    })
}

/// Report the outcome of the ticket numbered `seq`.
///
/// Pass the response when the round-trip finished (any status). Pass a null
/// `response` when it failed at the transport level; `network_error` then
/// describes the failure and may itself be null.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_complete(
    screen: *mut FfiScreenController,
    client: *const FfiBoardClient,
    seq: u64,
    response: *const FfiHttpResponse,
    network_error: *const c_char,
) -> FfiCompletion {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || client.is_null() {
            return FfiCompletion::Invalid;
        }
        let screen = unsafe { &mut *screen };
        let client = unsafe { &*client };
        let outcome = if response.is_null() {
            let reason = unsafe { read_opt_string(network_error) }.unwrap_or_else(|| "network request failed".to_string());
            Err(ApiError::network(reason))
        } else {
            Ok(ffi_response_to_core(unsafe { &*response }))
        };
        types::with_screen!(&mut screen.inner, c => c.complete(&client.inner, seq, outcome)).into()
    }))
    .unwrap_or(FfiCompletion::Invalid)
}

/// Tear the screen down. Later completions are discarded. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_unmount(screen: *mut FfiScreenController) {
    if screen.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &mut *screen };
        types::with_screen!(&mut screen.inner, c => c.unmount());
    }));
}

/// True between mount and unmount. Hosts may poll this to abort in-flight
/// requests.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_is_mounted(screen: *const FfiScreenController) -> bool {
    if screen.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &*screen };
        types::with_screen!(&screen.inner, c => c.is_mounted())
    }))
    .unwrap_or(false)
}

/// Current view phase. Null reads as `Idle`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_phase(screen: *const FfiScreenController) -> FfiPhase {
    if screen.is_null() {
        return FfiPhase::Idle;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let screen = unsafe { &*screen };
        types::with_screen!(&screen.inner, c => c.phase()).into()
    }))
    .unwrap_or(FfiPhase::Idle)
}

/// The pending alert, or null. Each alert is returned once.
/// Free it with `board_free_alert`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_take_alert(screen: *mut FfiScreenController) -> *mut FfiAlert {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        match types::with_screen!(&mut screen.inner, c => c.take_alert()) {
            Some(alert) => Box::into_raw(Box::new(FfiAlert {
                title: c_string(alert.title),
                message: c_string(alert.message),
            })),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Snapshot of the posts a feed screen renders. Empty while loading for the
/// first time and on error. Null for the detail screen or a null handle.
/// Free it with `board_free_post_list`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_items(screen: *const FfiScreenController) -> *mut FfiPostList {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &(*screen).inner } {
            ScreenHandle::Main(c) => FfiPostList::from_core(c.items()),
            ScreenHandle::Board(c) => FfiPostList::from_core(c.items()),
            ScreenHandle::Detail(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// "no posts" when a feed finished loading with nothing to show, else null.
/// Free it with `board_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_empty_message(screen: *const FfiScreenController) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let message = match unsafe { &(*screen).inner } {
            ScreenHandle::Main(c) => c.empty_message(),
            ScreenHandle::Board(c) => c.empty_message(),
            ScreenHandle::Detail(_) => None,
        };
        c_string_opt(message)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Snapshot of the loaded post on a detail screen, or null.
/// Free it with `board_free_post_detail`.
#[unsafe(no_mangle)]
pub extern "C" fn board_screen_post(screen: *const FfiScreenController) -> *mut FfiPostDetail {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &(*screen).inner } {
            ScreenHandle::Detail(c) => match c.post() {
                Some(post) => Box::into_raw(Box::new(FfiPostDetail::from_core(post))),
                None => std::ptr::null_mut(),
            },
            _ => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `board_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free an `FfiBoardResult` returned by any `board_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_result(result: *mut FfiBoardResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let result = Box::from_raw(result);
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::PostList => FfiPostList::free(result.data as *mut FfiPostList),
            FfiDataTag::PostDetail => {
                let detail = Box::from_raw(result.data as *mut FfiPostDetail);
                detail.free_fields();
            }
            FfiDataTag::Json => free_c_string(result.data as *mut c_char),
            FfiDataTag::None => {}
        }
    });
}

/// Free a ticket and its request. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_ticket(ticket: *mut FfiTicket) {
    if ticket.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let ticket = Box::from_raw(ticket);
        FfiHttpRequest::free(ticket.request);
    });
}

/// Free an alert from `board_screen_take_alert`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_alert(alert: *mut FfiAlert) {
    if alert.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let alert = Box::from_raw(alert);
        free_c_string(alert.title);
        free_c_string(alert.message);
    });
}

/// Free a list from `board_screen_items`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_post_list(list: *mut FfiPostList) {
    let _ = catch_unwind(|| unsafe { FfiPostList::free(list) });
}

/// Free a post from `board_screen_post`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_post_detail(post: *mut FfiPostDetail) {
    if post.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let post = Box::from_raw(post);
        post.free_fields();
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn board_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
