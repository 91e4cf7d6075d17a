//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.
//!
//! Arrays handed to C are boxed slices, so `len` is also the allocation's
//! capacity when they come back to be freed.

use std::ffi::CString;
use std::os::raw::c_char;

use board_core::{
    ApiError, BoardFeed, BoardFeedController, Completion, HttpMethod, MainFeed, MainFeedController, Phase, Post,
    PostDetail, PostDetailController, PostFile, Ticket,
};

/// Opaque handle to a `BoardClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiBoardClient {
    pub(crate) inner: board_core::BoardClient,
}

/// Owned C string from Rust text. Interior NULs are dropped.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let cleaned = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

pub(crate) fn c_string_opt(s: Option<&str>) -> *mut c_char {
    match s {
        Some(s) => c_string(s),
        None => std::ptr::null_mut(),
    }
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
pub(crate) fn into_raw_array<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim an array produced by `into_raw_array`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_array` and not have been freed.
pub(crate) unsafe fn from_raw_array<T>(ptr: *mut T, len: u32) -> Option<Box<[T]>> {
    if ptr.is_null() || len == 0 {
        return None;
    }
    Some(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) })
}

/// Free a C string produced by `c_string`. Null is ignored.
///
/// # Safety
/// `s` must be null or come from `CString::into_raw` and not have been freed.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `board_build_*` functions. The C caller executes the request,
/// aborting after `timeout_ms`, and passes the response back through
/// `board_parse_*`. `body` is raw bytes (`body_len` long), null when absent.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: u32,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: board_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_array(headers);

        let body_bytes = req.body.map(|b| b.as_bytes().to_vec()).unwrap_or_default();
        let (body, body_len) = into_raw_array(body_bytes);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body,
            body_len,
            timeout_ms: req.timeout_ms,
        }))
    }

    /// Release a request produced by `from_core`. Null is ignored.
    ///
    /// # Safety
    /// `req` must be null or come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(req: *mut Self) {
        if req.is_null() {
            return;
        }
        unsafe {
            let req = Box::from_raw(req);
            free_c_string(req.url);
            drop(from_raw_array(req.body, req.body_len));
            if let Some(headers) = from_raw_array(req.headers, req.headers_len) {
                for h in headers.iter() {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `board_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiBoardResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Server = 2,
    MalformedResponse = 3,
    Deserialization = 4,
    Serialization = 5,
    Panic = 6,
    NullArg = 7,
}

/// Tag that tells `board_free_result` what `FfiBoardResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    PostList = 1,
    PostDetail = 2,
    /// `data` is a NUL-terminated JSON document.
    Json = 3,
}

/// A feed entry exposed to C. `thumbnail_url` is the card preview or null.
#[repr(C)]
pub struct FfiPost {
    pub id: i64,
    pub team: *mut c_char,
    pub title: *mut c_char,
    pub content: *mut c_char,
    pub created_at: *mut c_char,
    pub like_count: u64,
    pub view_count: u64,
    pub username: *mut c_char,
    pub thumbnail_url: *mut c_char,
}

impl FfiPost {
    fn from_core(post: &Post) -> Self {
        FfiPost {
            id: post.id,
            team: c_string(post.team.as_str()),
            title: c_string(post.title.as_str()),
            content: c_string(post.content.as_str()),
            created_at: c_string(post.created_at.as_str()),
            like_count: post.like_count,
            view_count: post.view_count,
            username: c_string(post.username.as_str()),
            thumbnail_url: c_string_opt(post.preview_thumbnail()),
        }
    }

    /// # Safety
    /// Fields must have been produced by `from_core` and not freed.
    pub(crate) unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.team);
            free_c_string(self.title);
            free_c_string(self.content);
            free_c_string(self.created_at);
            free_c_string(self.username);
            free_c_string(self.thumbnail_url);
        }
    }
}

/// A list of feed entries exposed to C.
#[repr(C)]
pub struct FfiPostList {
    pub items: *mut FfiPost,
    pub len: u32,
}

impl FfiPostList {
    pub(crate) fn from_core(posts: &[Post]) -> *mut Self {
        let items: Vec<FfiPost> = posts.iter().map(FfiPost::from_core).collect();
        let (items, len) = into_raw_array(items);
        Box::into_raw(Box::new(FfiPostList { items, len }))
    }

    /// # Safety
    /// `list` must be null or come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(list: *mut Self) {
        if list.is_null() {
            return;
        }
        unsafe {
            let list = Box::from_raw(list);
            if let Some(items) = from_raw_array(list.items, list.len) {
                for item in items.iter() {
                    item.free_fields();
                }
            }
        }
    }
}

/// A downloadable attachment exposed to C.
#[repr(C)]
pub struct FfiPostFile {
    pub file_name: *mut c_char,
    pub download_url: *mut c_char,
    pub thumbnail_url: *mut c_char,
}

impl FfiPostFile {
    fn from_core(file: &PostFile) -> Self {
        FfiPostFile {
            file_name: c_string(file.file_name.as_str()),
            download_url: c_string(file.download_url.as_str()),
            thumbnail_url: c_string_opt(file.thumbnail_url.as_deref()),
        }
    }
}

/// A full post exposed to C. `video_id` is pre-extracted from `youtubelink`.
#[repr(C)]
pub struct FfiPostDetail {
    pub id: i64,
    pub team: *mut c_char,
    pub title: *mut c_char,
    pub content: *mut c_char,
    pub created_at: *mut c_char,
    pub updated_at: *mut c_char,
    pub like_count: u64,
    pub view_count: u64,
    pub username: *mut c_char,
    pub youtubelink: *mut c_char,
    pub video_id: *mut c_char,
    pub liked: bool,
    pub files: *mut FfiPostFile,
    pub files_len: u32,
}

impl FfiPostDetail {
    pub(crate) fn from_core(post: &PostDetail) -> Self {
        let files: Vec<FfiPostFile> = post.files.iter().map(FfiPostFile::from_core).collect();
        let (files, files_len) = into_raw_array(files);
        FfiPostDetail {
            id: post.id,
            team: c_string(post.team.as_str()),
            title: c_string(post.title.as_str()),
            content: c_string(post.content.as_str()),
            created_at: c_string(post.created_at.as_str()),
            updated_at: c_string(post.updated_at.as_str()),
            like_count: post.like_count,
            view_count: post.view_count,
            username: c_string(post.username.as_str()),
            youtubelink: c_string_opt(post.youtubelink.as_deref()),
            video_id: c_string_opt(post.video_id()),
            liked: post.liked,
            files,
            files_len,
        }
    }

    /// # Safety
    /// Fields must have been produced by `from_core` and not freed.
    pub(crate) unsafe fn free_fields(&self) {
        unsafe {
            free_c_string(self.team);
            free_c_string(self.title);
            free_c_string(self.content);
            free_c_string(self.created_at);
            free_c_string(self.updated_at);
            free_c_string(self.username);
            free_c_string(self.youtubelink);
            free_c_string(self.video_id);
            if let Some(files) = from_raw_array(self.files, self.files_len) {
                for f in files.iter() {
                    free_c_string(f.file_name);
                    free_c_string(f.download_url);
                    free_c_string(f.thumbnail_url);
                }
            }
        }
    }
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiBoardResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiBoardResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiBoardResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiBoardResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a `FfiPostList`.
    pub(crate) fn ok_post_list(posts: Vec<Post>) -> *mut Self {
        Self::ok(FfiDataTag::PostList, FfiPostList::from_core(&posts) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a single `FfiPostDetail`.
    pub(crate) fn ok_post_detail(post: PostDetail) -> *mut Self {
        let detail = Box::new(FfiPostDetail::from_core(&post));
        Self::ok(FfiDataTag::PostDetail, Box::into_raw(detail) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a JSON document.
    pub(crate) fn ok_json(value: &serde_json::Value) -> *mut Self {
        Self::ok(FfiDataTag::Json, c_string(value.to_string()) as *mut std::ffi::c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Server { .. } => FfiErrorCode::Server,
            ApiError::MalformedResponse(_) => FfiErrorCode::MalformedResponse,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
        };
        Self::err(code, err.status().unwrap_or(0), &err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg)
    }
}

// ---------------------------------------------------------------------------
// Screen controllers
// ---------------------------------------------------------------------------

/// Which screen a controller handle drives.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiScreenKind {
    MainFeed = 0,
    BoardFeed = 1,
    PostDetail = 2,
}

pub(crate) enum ScreenHandle {
    Main(MainFeedController),
    Board(BoardFeedController),
    Detail(PostDetailController),
}

/// Run the same expression against whichever controller the handle holds.
macro_rules! with_screen {
    ($handle:expr, $c:ident => $body:expr) => {
        match $handle {
            $crate::types::ScreenHandle::Main($c) => $body,
            $crate::types::ScreenHandle::Board($c) => $body,
            $crate::types::ScreenHandle::Detail($c) => $body,
        }
    };
}
pub(crate) use with_screen;

/// Opaque handle to one screen's view state.
pub struct FfiScreenController {
    pub(crate) inner: ScreenHandle,
}

impl FfiScreenController {
    pub(crate) fn new(kind: FfiScreenKind, post_id: i64) -> Self {
        let inner = match kind {
            FfiScreenKind::MainFeed => ScreenHandle::Main(MainFeedController::new(MainFeed)),
            FfiScreenKind::BoardFeed => ScreenHandle::Board(BoardFeedController::new(BoardFeed)),
            FfiScreenKind::PostDetail => ScreenHandle::Detail(PostDetailController::for_post(post_id)),
        };
        FfiScreenController { inner }
    }
}

/// View phase as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiPhase {
    Idle = 0,
    Loading = 1,
    Loaded = 2,
    Refreshing = 3,
    Error = 4,
}

impl From<Phase> for FfiPhase {
    fn from(p: Phase) -> Self {
        match p {
            Phase::Idle => FfiPhase::Idle,
            Phase::Loading => FfiPhase::Loading,
            Phase::Loaded => FfiPhase::Loaded,
            Phase::Refreshing => FfiPhase::Refreshing,
            Phase::Error => FfiPhase::Error,
        }
    }
}

/// Outcome of `board_screen_complete`. `Invalid` means a null argument or a
/// caught panic.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCompletion {
    Applied = 0,
    Stale = 1,
    Discarded = 2,
    Invalid = 3,
}

impl From<Completion> for FfiCompletion {
    fn from(c: Completion) -> Self {
        match c {
            Completion::Applied => FfiCompletion::Applied,
            Completion::Stale => FfiCompletion::Stale,
            Completion::Discarded => FfiCompletion::Discarded,
        }
    }
}

/// A request the host must execute and report back under `seq`.
#[repr(C)]
pub struct FfiTicket {
    pub seq: u64,
    pub request: *mut FfiHttpRequest,
}

impl FfiTicket {
    pub(crate) fn from_core(ticket: Ticket) -> *mut Self {
        Box::into_raw(Box::new(FfiTicket {
            seq: ticket.seq,
            request: FfiHttpRequest::from_core(ticket.request),
        }))
    }
}

/// A one-shot dialog to show the user.
#[repr(C)]
pub struct FfiAlert {
    pub title: *mut c_char,
    pub message: *mut c_char,
}
