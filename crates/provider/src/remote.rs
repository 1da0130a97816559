use crate::{Backend, BackendKind};
use analytics_service::AnalyticsClient;
use async_trait::async_trait;
use auth_service::AuthClient;
use domain::{
    Ack, Comment, EventInput, FilterEntry, ProviderError, Session, TokenBundle, Video, VideoPage,
    VideoQuery,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use video_service::VideoClient;

/// Placeholder for the real HTTP backend. Every call is rejected with
/// [`ProviderError::NotImplemented`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteBackend;

impl RemoteBackend {
    pub fn new() -> Self {
        Self
    }
}

fn not_implemented<T>(operation: &'static str) -> Result<T, ProviderError> {
    tracing::debug!(operation, "Remote backend call rejected");
    Err(ProviderError::NotImplemented(operation))
}

impl Backend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn auth(&self) -> Arc<dyn AuthClient> {
        Arc::new(*self)
    }

    fn videos(&self) -> Arc<dyn VideoClient> {
        Arc::new(*self)
    }

    fn analytics(&self) -> Arc<dyn AnalyticsClient> {
        Arc::new(*self)
    }
}

#[async_trait]
impl AuthClient for RemoteBackend {
    async fn get_current_user(&self) -> Result<Session, ProviderError> {
        not_implemented("auth.get_current_user")
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<TokenBundle, ProviderError> {
        not_implemented("auth.login")
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _username: &str,
    ) -> Result<TokenBundle, ProviderError> {
        not_implemented("auth.register")
    }

    async fn logout(&self) -> Result<Ack, ProviderError> {
        not_implemented("auth.logout")
    }
}

#[async_trait]
impl VideoClient for RemoteBackend {
    async fn get_popular_videos(&self, _limit: u32) -> Result<VideoPage, ProviderError> {
        not_implemented("videos.get_popular_videos")
    }

    async fn get_videos(&self, _query: &VideoQuery) -> Result<VideoPage, ProviderError> {
        not_implemented("videos.get_videos")
    }

    async fn get_video(&self, _id: &str) -> Result<Video, ProviderError> {
        not_implemented("videos.get_video")
    }

    async fn search_videos(
        &self,
        _q: &str,
        _page: u32,
        _page_size: u32,
    ) -> Result<VideoPage, ProviderError> {
        not_implemented("videos.search_videos")
    }

    async fn get_search_suggestions(&self, _q: &str) -> Result<Vec<String>, ProviderError> {
        not_implemented("videos.get_search_suggestions")
    }

    async fn get_comments(&self, _video_id: &str) -> Result<Vec<Comment>, ProviderError> {
        not_implemented("videos.get_comments")
    }

    async fn get_filters(&self) -> Result<Vec<FilterEntry>, ProviderError> {
        not_implemented("videos.get_filters")
    }
}

#[async_trait]
impl AnalyticsClient for RemoteBackend {
    async fn track_event(
        &self,
        _event_type: &str,
        _properties: Map<String, Value>,
    ) -> Result<Ack, ProviderError> {
        not_implemented("analytics.track_event")
    }

    async fn track_batch_events(&self, _events: Vec<EventInput>) -> Result<Ack, ProviderError> {
        not_implemented("analytics.track_batch_events")
    }
}
