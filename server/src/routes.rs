use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use domain::{FilterCategory, Video};
use provider::DataProvider;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use views::feed::{DEFAULT_PAGE_SIZE, FeedPhase};
use views::format::{format_card_duration, format_time_ago, format_view_count};
use views::search::on_query_change;
use views::{
    FeedController, LoadOutcome, Route, SearchBox, SessionStore, WatchState, WatchView,
    load_watch_page,
};

#[derive(Clone)]
pub struct AppState {
    provider: DataProvider,
    session: Arc<SessionStore>,
    page_size: u32,
}

impl AppState {
    pub fn new(provider: DataProvider, session: Arc<SessionStore>) -> Self {
        Self {
            provider,
            session,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        error: error.into(),
    };
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Video not found")
}

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPill {
    pub id: FilterCategory,
    pub label: &'static str,
    pub count: Option<u32>,
    pub active: bool,
}

/// A grid card with its display labels resolved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    pub id: String,
    pub title: String,
    pub author: String,
    pub thumbnail_url: String,
    pub is_live: bool,
    pub duration: String,
    pub views: String,
    pub published: String,
    pub href: String,
}

impl VideoCard {
    fn new(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            author: video.author.display_name.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            is_live: video.is_live(),
            duration: format_card_duration(video.duration),
            views: format_view_count(video.view_count),
            published: format_time_ago(video.created_at, Utc::now()),
            href: Route::Watch {
                video_id: video.id.clone(),
            }
            .to_path(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub signed_in: bool,
    pub filters: Vec<FilterPill>,
    pub phase: FeedPhase,
    pub page: u32,
    pub has_more: bool,
    pub videos: Vec<VideoCard>,
}

async fn home(State(state): State<AppState>, Query(params): Query<HomeParams>) -> Response {
    let filter = match params.filter.as_deref().map(str::parse::<FilterCategory>) {
        None => FilterCategory::default(),
        Some(Ok(filter)) => filter,
        Some(Err(err)) => return error_response(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let feed = FeedController::new(state.provider.clone(), state.page_size);
    feed.select_filter(filter).await;
    let target = params.page.unwrap_or(1);
    while feed.snapshot().page < target {
        if feed.load_more().await != LoadOutcome::Applied {
            break;
        }
    }

    let counts = state
        .provider
        .videos()
        .get_filters()
        .await
        .unwrap_or_else(|err| {
            tracing::debug!(error = %err, "Filter counts unavailable");
            Vec::new()
        });

    let snapshot = feed.snapshot();
    let view = HomeView {
        signed_in: state.session.current().is_signed_in(),
        filters: FilterCategory::ALL
            .into_iter()
            .map(|category| FilterPill {
                id: category,
                label: category.label(),
                count: counts
                    .iter()
                    .find(|entry| entry.id == category)
                    .map(|entry| entry.count),
                active: category == snapshot.filter,
            })
            .collect(),
        phase: snapshot.phase,
        page: snapshot.page,
        has_more: snapshot.has_more,
        videos: snapshot.videos.iter().map(VideoCard::new).collect(),
    };
    Json(view).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    #[serde(flatten)]
    pub view: WatchView,
    pub duration_label: String,
    pub views_label: String,
    pub published_label: String,
}

async fn watch(State(state): State<AppState>, uri: Uri) -> Response {
    let target = uri.path_and_query().map_or("/watch", |target| target.as_str());
    let Route::Watch { video_id } = Route::parse(target) else {
        return not_found();
    };

    match load_watch_page(&state.provider, &video_id, state.session.session()).await {
        WatchState::Ready(page) => {
            let view = page.view();
            let response = WatchResponse {
                duration_label: format_card_duration(view.video.duration),
                views_label: format_view_count(view.video.view_count),
                published_label: format_time_ago(view.video.published_at, Utc::now()),
                view,
            };
            Json(response).into_response()
        }
        WatchState::NotFound => not_found(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> Response {
    let search = Mutex::new(SearchBox::new());
    on_query_change(&search, state.provider.videos(), &params.q).await;
    let search = search.into_inner().unwrap_or_else(PoisonError::into_inner);
    Json(search).into_response()
}

async fn fallback() -> Response {
    not_found()
}

/// Create the router for the navigation shell
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/watch", get(watch))
        .route("/suggestions", get(suggestions))
        .fallback(fallback)
        .with_state(state)
}
