//! Per-screen view state: fetch on mount, pull-to-refresh, teardown.
//!
//! # Design
//! A `ScreenController` owns the state of one screen instance and never
//! performs I/O. `mount` and `refresh` hand out a `Ticket` carrying the
//! request and a sequence number; the host executes the request and reports
//! back through `complete`. Only the completion whose sequence number is the
//! latest issued is applied, so a slow response to an earlier refresh can
//! never overwrite a newer one. `unmount` cancels the screen's token; every
//! completion after that is discarded.
//!
//! What is fetched and how it is parsed is supplied by a `Screen`
//! implementation (`MainFeed`, `BoardFeed`, `PostDetailScreen`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::BoardClient;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Post, PostDetail};

pub const LIST_FAILURE_MESSAGE: &str = "failed to load posts";
pub const DETAIL_FAILURE_MESSAGE: &str = "post not found";
pub const EMPTY_LIST_MESSAGE: &str = "no posts";
pub const ALERT_TITLE: &str = "오류";

/// What a screen fetches and how it reads the answer.
pub trait Screen {
    type Data;

    fn request(&self, client: &BoardClient) -> HttpRequest;
    fn parse(&self, client: &BoardClient, response: HttpResponse) -> ApiResult<Self::Data>;
    /// User-facing text shown when the load fails.
    fn failure_message(&self) -> &'static str;
}

/// Home feed (`GET /`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MainFeed;

impl Screen for MainFeed {
    type Data = Vec<Post>;

    fn request(&self, client: &BoardClient) -> HttpRequest {
        client.build_main_feed()
    }

    fn parse(&self, client: &BoardClient, response: HttpResponse) -> ApiResult<Vec<Post>> {
        client.parse_post_list(response)
    }

    fn failure_message(&self) -> &'static str {
        LIST_FAILURE_MESSAGE
    }
}

/// Board listing (`GET /post`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardFeed;

impl Screen for BoardFeed {
    type Data = Vec<Post>;

    fn request(&self, client: &BoardClient) -> HttpRequest {
        client.build_board_list()
    }

    fn parse(&self, client: &BoardClient, response: HttpResponse) -> ApiResult<Vec<Post>> {
        client.parse_post_list(response)
    }

    fn failure_message(&self) -> &'static str {
        LIST_FAILURE_MESSAGE
    }
}

/// A single post, keyed by the id passed at navigation time.
#[derive(Debug, Clone, Copy)]
pub struct PostDetailScreen {
    pub post_id: i64,
}

impl Screen for PostDetailScreen {
    type Data = PostDetail;

    fn request(&self, client: &BoardClient) -> HttpRequest {
        client.build_post_detail(self.post_id)
    }

    fn parse(&self, client: &BoardClient, response: HttpResponse) -> ApiResult<PostDetail> {
        client.parse_post_detail(response)
    }

    fn failure_message(&self) -> &'static str {
        DETAIL_FAILURE_MESSAGE
    }
}

/// Shared cancellation flag scoped to one screen's lifetime.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A request the host must execute, tagged with its sequence number.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub seq: u64,
    pub request: HttpRequest,
    pub cancel: CancellationToken,
}

/// Why the screen is showing its error view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    pub message: &'static str,
    pub cause: ApiError,
}

/// One-shot notification the host shows as a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Refreshing(T),
    Error(ScreenError),
}

/// Data-free view of `ViewState`, handy across the FFI boundary and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Refreshing,
    Error,
}

impl<T> ViewState<T> {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Idle => Phase::Idle,
            ViewState::Loading => Phase::Loading,
            ViewState::Loaded(_) => Phase::Loaded,
            ViewState::Refreshing(_) => Phase::Refreshing,
            ViewState::Error(_) => Phase::Error,
        }
    }

    /// The data on screen, kept visible while refreshing.
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(d) | ViewState::Refreshing(d) => Some(d),
            _ => None,
        }
    }
}

/// Result of reporting a finished round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was the latest and updated the state.
    Applied,
    /// A newer ticket was issued, or this one was already applied; the
    /// response was ignored.
    Stale,
    /// The screen was torn down; the response was ignored.
    Discarded,
}

pub struct ScreenController<S: Screen> {
    screen: S,
    state: ViewState<S::Data>,
    latest_seq: u64,
    applied_seq: u64,
    cancel: CancellationToken,
    mounted: bool,
    alert: Option<Alert>,
}

pub type MainFeedController = ScreenController<MainFeed>;
pub type BoardFeedController = ScreenController<BoardFeed>;
pub type PostDetailController = ScreenController<PostDetailScreen>;

impl<S: Screen> ScreenController<S> {
    pub fn new(screen: S) -> Self {
        Self {
            screen,
            state: ViewState::Idle,
            latest_seq: 0,
            applied_seq: 0,
            cancel: CancellationToken::default(),
            mounted: false,
            alert: None,
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn state(&self) -> &ViewState<S::Data> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// True between `mount` and `unmount`.
    pub fn is_mounted(&self) -> bool {
        self.mounted && !self.cancel.is_cancelled()
    }

    /// First load. Only valid once, from `Idle`.
    pub fn mount(&mut self, client: &BoardClient) -> Option<Ticket> {
        if self.mounted || self.cancel.is_cancelled() {
            tracing::debug!("mount ignored: screen already mounted or torn down");
            return None;
        }
        self.mounted = true;
        self.state = ViewState::Loading;
        Some(self.issue(client))
    }

    /// Pull-to-refresh. Supersedes any in-flight load.
    pub fn refresh(&mut self, client: &BoardClient) -> Option<Ticket> {
        if !self.is_mounted() {
            tracing::debug!("refresh ignored: screen not mounted");
            return None;
        }
        self.state = match std::mem::replace(&mut self.state, ViewState::Idle) {
            ViewState::Loaded(d) | ViewState::Refreshing(d) => ViewState::Refreshing(d),
            ViewState::Loading | ViewState::Error(_) | ViewState::Idle => ViewState::Loading,
        };
        Some(self.issue(client))
    }

    fn issue(&mut self, client: &BoardClient) -> Ticket {
        self.latest_seq += 1;
        let request = self.screen.request(client);
        tracing::debug!(seq = self.latest_seq, url = %request.url, phase = ?self.phase(), "issued load");
        Ticket {
            seq: self.latest_seq,
            request,
            cancel: self.cancel.clone(),
        }
    }

    /// Report the outcome of the ticket numbered `seq`. Each ticket applies
    /// at most once; repeats report `Stale`.
    ///
    /// Hosts map transport failures to `ApiError::Network`.
    pub fn complete(
        &mut self,
        client: &BoardClient,
        seq: u64,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Completion {
        if !self.is_mounted() {
            tracing::debug!(seq, "discarding completion for torn-down screen");
            return Completion::Discarded;
        }
        if seq != self.latest_seq || seq == self.applied_seq {
            tracing::debug!(seq, latest = self.latest_seq, "ignoring stale completion");
            return Completion::Stale;
        }
        self.applied_seq = seq;

        match outcome.and_then(|response| self.screen.parse(client, response)) {
            Ok(data) => {
                self.state = ViewState::Loaded(data);
            }
            Err(cause) => {
                let message = self.screen.failure_message();
                tracing::error!(seq, error = %cause, "screen load failed");
                self.alert = Some(Alert {
                    title: ALERT_TITLE,
                    message,
                });
                self.state = ViewState::Error(ScreenError { message, cause });
            }
        }
        Completion::Applied
    }

    /// Tear down. Outstanding tickets observe cancellation.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        self.alert = None;
    }

    /// The pending alert, if any; each alert is returned once.
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }
}

impl<S: Screen<Data = Vec<Post>>> ScreenController<S> {
    /// Posts to render. Empty while loading for the first time and on error.
    pub fn items(&self) -> &[Post] {
        self.state.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Placeholder text when a finished load produced no posts.
    pub fn empty_message(&self) -> Option<&'static str> {
        match &self.state {
            ViewState::Loaded(items) if items.is_empty() => Some(EMPTY_LIST_MESSAGE),
            _ => None,
        }
    }
}

impl ScreenController<PostDetailScreen> {
    pub fn for_post(post_id: i64) -> Self {
        Self::new(PostDetailScreen { post_id })
    }

    pub fn post(&self) -> Option<&PostDetail> {
        self.state.data()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.post().and_then(PostDetail::video_id)
    }
}
