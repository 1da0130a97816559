//! Discovery grid: filter selection, paging and infinite scroll.
//!
//! [`FeedEngine`] is the synchronous state machine. It hands out a
//! [`FeedRequest`] for every load it wants and only accepts a response for
//! the request it is currently waiting on. Anything else is stale, either
//! superseded by a filter change or a duplicate, and gets dropped.
//! [`FeedController`] drives the engine against a [`DataProvider`].

use crate::route::Route;
use analytics_service::{properties, track_quietly};
use domain::{FilterCategory, ProviderError, Video, VideoPage, VideoQuery};
use provider::DataProvider;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use video_service::VideoClient;

pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Fraction of the document height the viewport bottom has to reach before
/// the next page is requested
pub const SCROLL_TRIGGER_RATIO: f64 = 0.8;

/// Scroll position reported by the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.viewport_height + self.scroll_top >= self.document_height * SCROLL_TRIGGER_RATIO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    Idle,
    /// First page for the current filter is on its way
    Loading,
    Loaded,
    LoadingMore,
    /// Everything for the current filter is on screen
    Exhausted,
}

/// A page load handed out by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub generation: u64,
    pub filter: FilterCategory,
    pub page: u32,
    pub page_size: u32,
}

impl FeedRequest {
    pub fn is_initial(&self) -> bool {
        self.page == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The response arrived after the request was superseded
    Stale,
    /// The provider failed; the feed fell back to a safe state
    Failed,
    /// Nothing was requested (already loading, or nothing left)
    Suppressed,
}

pub struct FeedEngine {
    filter: FilterCategory,
    videos: Vec<Video>,
    page: u32,
    page_size: u32,
    has_more: bool,
    phase: FeedPhase,
    generation: u64,
    in_flight: Option<FeedRequest>,
}

impl FeedEngine {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: FilterCategory::All,
            videos: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            has_more: false,
            phase: FeedPhase::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn filter(&self) -> FilterCategory {
        self.filter
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// Whether the manual "Load More" control should be offered
    pub fn can_load_more(&self) -> bool {
        self.phase == FeedPhase::Loaded && self.has_more && self.in_flight.is_none()
    }

    /// Starts over on page 1 of the current filter. Any outstanding request
    /// becomes stale.
    pub fn begin_initial(&mut self) -> FeedRequest {
        self.generation += 1;
        self.page = 1;
        self.has_more = false;
        self.phase = FeedPhase::Loading;
        let request = FeedRequest {
            generation: self.generation,
            filter: self.filter,
            page: 1,
            page_size: self.page_size,
        };
        self.in_flight = Some(request);
        request
    }

    /// Switches filter and restarts paging. Selecting the active filter
    /// again does nothing once the feed has been mounted.
    pub fn change_filter(&mut self, filter: FilterCategory) -> Option<FeedRequest> {
        if filter == self.filter && self.phase != FeedPhase::Idle {
            return None;
        }
        tracing::info!(from = %self.filter, to = %filter, "Feed filter changed");
        self.filter = filter;
        Some(self.begin_initial())
    }

    /// Requests the next page, unless a load is already running or there
    /// is nothing left.
    pub fn begin_load_more(&mut self) -> Option<FeedRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.phase = FeedPhase::LoadingMore;
        let request = FeedRequest {
            generation: self.generation,
            filter: self.filter,
            page: self.page + 1,
            page_size: self.page_size,
        };
        self.in_flight = Some(request);
        Some(request)
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<FeedRequest> {
        if metrics.near_bottom() {
            self.begin_load_more()
        } else {
            None
        }
    }

    /// Folds the response for `request` into the feed.
    pub fn apply(
        &mut self,
        request: &FeedRequest,
        result: Result<VideoPage, ProviderError>,
    ) -> LoadOutcome {
        if self.in_flight.as_ref() != Some(request) {
            tracing::debug!(
                generation = request.generation,
                page = request.page,
                "Discarding stale feed response"
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                if request.is_initial() {
                    self.videos = page.videos;
                } else {
                    self.videos.extend(page.videos);
                }
                self.page = request.page;
                self.has_more = request.page < page.pagination.total_pages;
                self.phase = if self.has_more {
                    FeedPhase::Loaded
                } else {
                    FeedPhase::Exhausted
                };
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(
                    filter = %request.filter,
                    page = request.page,
                    error = %err,
                    "Failed to load videos"
                );
                if request.is_initial() {
                    self.videos.clear();
                    self.has_more = false;
                }
                // A failed "load more" keeps has_more so the user can retry
                self.phase = FeedPhase::Loaded;
                LoadOutcome::Failed
            }
        }
    }
}

impl Default for FeedEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Issues the provider call behind `request`
pub async fn fetch_page(
    videos: &dyn VideoClient,
    request: &FeedRequest,
) -> Result<VideoPage, ProviderError> {
    if request.filter.uses_popular_ranking() {
        videos.get_popular_videos(request.page_size).await
    } else {
        // No per-category listing on the backend yet
        videos
            .get_videos(&VideoQuery {
                page: request.page,
                page_size: request.page_size,
                ..VideoQuery::default()
            })
            .await
    }
}

/// What the grid renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub filter: FilterCategory,
    pub phase: FeedPhase,
    pub page: u32,
    pub has_more: bool,
    pub can_load_more: bool,
    pub videos: Vec<Video>,
}

pub struct FeedController {
    provider: DataProvider,
    engine: Mutex<FeedEngine>,
}

impl FeedController {
    pub fn new(provider: DataProvider, page_size: u32) -> Self {
        Self {
            provider,
            engine: Mutex::new(FeedEngine::new(page_size)),
        }
    }

    fn with_engine<T>(&self, f: impl FnOnce(&mut FeedEngine) -> T) -> T {
        let mut engine = self
            .engine
            .lock()
            .expect("Failed to acquire lock on feed engine");
        f(&mut engine)
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.with_engine(|engine| FeedSnapshot {
            filter: engine.filter(),
            phase: engine.phase(),
            page: engine.page(),
            has_more: engine.has_more(),
            can_load_more: engine.can_load_more(),
            videos: engine.videos().to_vec(),
        })
    }

    /// Initial load when the grid appears
    pub async fn mount(&self) -> LoadOutcome {
        let request = self.with_engine(FeedEngine::begin_initial);
        self.run(request).await
    }

    pub async fn select_filter(&self, filter: FilterCategory) -> LoadOutcome {
        match self.with_engine(|engine| engine.change_filter(filter)) {
            Some(request) => self.run(request).await,
            None => LoadOutcome::Suppressed,
        }
    }

    /// The manual "Load More" control
    pub async fn load_more(&self) -> LoadOutcome {
        match self.with_engine(FeedEngine::begin_load_more) {
            Some(request) => self.run(request).await,
            None => LoadOutcome::Suppressed,
        }
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> LoadOutcome {
        match self.with_engine(|engine| engine.on_scroll(metrics)) {
            Some(request) => self.run(request).await,
            None => LoadOutcome::Suppressed,
        }
    }

    async fn run(&self, request: FeedRequest) -> LoadOutcome {
        let result = fetch_page(self.provider.videos(), &request).await;
        let outcome = self.with_engine(|engine| engine.apply(&request, result));
        if outcome == LoadOutcome::Applied && request.is_initial() {
            self.track(
                "page_view",
                properties([("page", json!("/")), ("filter", json!(request.filter.id()))]),
            );
        }
        outcome
    }

    /// Sends an analytics event on its own task; the caller never waits on it
    fn track(&self, event_type: &'static str, properties: Map<String, Value>) {
        let analytics = self.provider.analytics_handle();
        tokio::spawn(async move {
            track_quietly(analytics.as_ref(), event_type, properties).await;
        });
    }

    /// Records the impression and returns where the card leads
    pub async fn open_video(&self, video: &Video) -> Route {
        self.track(
            "video_view_impression",
            properties([
                ("video_id", json!(video.id)),
                ("video_title", json!(video.title)),
                ("author", json!(video.author.username)),
            ]),
        );
        Route::Watch {
            video_id: video.id.clone(),
        }
    }
}
