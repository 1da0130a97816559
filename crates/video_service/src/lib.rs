use async_trait::async_trait;
use datastore::{NetworkSimulator, Repository};
use domain::{Comment, FilterEntry, ProviderError, Video, VideoPage, VideoQuery};
use std::sync::Arc;
use std::time::Duration;

pub mod listing;

pub use listing::{MAX_SUGGESTIONS, MIN_SUGGESTION_QUERY_CHARS};

const POPULAR_LATENCY: Duration = Duration::from_millis(300);
const LIST_LATENCY: Duration = Duration::from_millis(250);
const GET_LATENCY: Duration = Duration::from_millis(150);
const SUGGESTIONS_LATENCY: Duration = Duration::from_millis(100);
const COMMENTS_LATENCY: Duration = Duration::from_millis(150);

/// The `videos` capability group of a data provider
#[async_trait]
pub trait VideoClient: Send + Sync {
    /// Most viewed videos, at most `limit` of them
    async fn get_popular_videos(&self, limit: u32) -> Result<VideoPage, ProviderError>;

    async fn get_videos(&self, query: &VideoQuery) -> Result<VideoPage, ProviderError>;

    /// Fails with [`ProviderError::NotFound`] for unknown ids
    async fn get_video(&self, id: &str) -> Result<Video, ProviderError>;

    async fn search_videos(
        &self,
        q: &str,
        page: u32,
        page_size: u32,
    ) -> Result<VideoPage, ProviderError> {
        self.get_videos(&VideoQuery {
            page,
            page_size,
            q: Some(q.to_string()),
            ..VideoQuery::default()
        })
        .await
    }

    /// Up to five distinct titles matching `q`. Queries shorter than two
    /// characters resolve to nothing without touching the backend.
    async fn get_search_suggestions(&self, q: &str) -> Result<Vec<String>, ProviderError>;

    /// Comment thread of a video, newest-first
    async fn get_comments(&self, video_id: &str) -> Result<Vec<Comment>, ProviderError>;

    /// Filter pills with the counts they advertise
    async fn get_filters(&self) -> Result<Vec<FilterEntry>, ProviderError>;
}

/// Video client backed by the in-memory repository
pub struct MockVideoClient {
    repo: Arc<dyn Repository>,
    network: NetworkSimulator,
}

impl MockVideoClient {
    pub fn new(repo: Arc<dyn Repository>, network: NetworkSimulator) -> Self {
        Self { repo, network }
    }
}

#[async_trait]
impl VideoClient for MockVideoClient {
    async fn get_popular_videos(&self, limit: u32) -> Result<VideoPage, ProviderError> {
        self.network
            .round_trip("videos.get_popular_videos", POPULAR_LATENCY)
            .await?;
        Ok(listing::rank_popular(self.repo.get_videos(), limit))
    }

    async fn get_videos(&self, query: &VideoQuery) -> Result<VideoPage, ProviderError> {
        self.network
            .round_trip("videos.get_videos", LIST_LATENCY)
            .await?;
        Ok(listing::query_videos(self.repo.get_videos(), query))
    }

    async fn get_video(&self, id: &str) -> Result<Video, ProviderError> {
        self.network
            .round_trip("videos.get_video", GET_LATENCY)
            .await?;
        self.repo
            .get_video(id)
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn get_search_suggestions(&self, q: &str) -> Result<Vec<String>, ProviderError> {
        if q.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
            return Ok(Vec::new());
        }
        self.network
            .round_trip("videos.get_search_suggestions", SUGGESTIONS_LATENCY)
            .await?;
        Ok(listing::suggest_titles(&self.repo.get_videos(), q))
    }

    async fn get_comments(&self, video_id: &str) -> Result<Vec<Comment>, ProviderError> {
        self.network
            .round_trip("videos.get_comments", COMMENTS_LATENCY)
            .await?;
        if self.repo.get_video(video_id).is_none() {
            return Err(ProviderError::NotFound(video_id.to_string()));
        }
        Ok(self.repo.get_comments(video_id))
    }

    async fn get_filters(&self) -> Result<Vec<FilterEntry>, ProviderError> {
        // static catalog metadata, no simulated round trip
        Ok(self.repo.filter_entries())
    }
}
