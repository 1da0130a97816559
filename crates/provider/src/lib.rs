//! The data provider: the one seam between view state and the backend.
//!
//! A [`DataProvider`] bundles the three capability groups (`auth`, `videos`,
//! `analytics`). It is built once at startup from a [`Backend`], either the
//! in-memory [`MockBackend`] or the [`RemoteBackend`] placeholder, and then
//! cloned into whatever needs it.

use analytics_service::{AnalyticsClient, EventSink};
use auth_service::AuthClient;
use std::sync::Arc;
use video_service::VideoClient;

mod config;
mod mock;
mod remote;

pub use config::{BackendKind, ConfigError, ProviderConfig};
pub use mock::MockBackend;
pub use remote::RemoteBackend;

/// A source for the three capability groups
pub trait Backend {
    fn kind(&self) -> BackendKind;

    fn auth(&self) -> Arc<dyn AuthClient>;

    fn videos(&self) -> Arc<dyn VideoClient>;

    fn analytics(&self) -> Arc<dyn AnalyticsClient>;
}

#[derive(Clone)]
pub struct DataProvider {
    kind: BackendKind,
    auth: Arc<dyn AuthClient>,
    videos: Arc<dyn VideoClient>,
    analytics: Arc<dyn AnalyticsClient>,
}

impl DataProvider {
    pub fn new(backend: &dyn Backend) -> Self {
        Self {
            kind: backend.kind(),
            auth: backend.auth(),
            videos: backend.videos(),
            analytics: backend.analytics(),
        }
    }

    /// Selects and builds the backend named by `config`
    pub fn from_config(config: &ProviderConfig, sink: Arc<dyn EventSink>) -> Self {
        tracing::info!(backend = %config.backend, "Creating data provider");
        match config.backend {
            BackendKind::Mock => Self::new(&MockBackend::from_config(config, sink)),
            BackendKind::Remote => Self::new(&RemoteBackend::new()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn auth(&self) -> &dyn AuthClient {
        self.auth.as_ref()
    }

    pub fn videos(&self) -> &dyn VideoClient {
        self.videos.as_ref()
    }

    pub fn analytics(&self) -> &dyn AnalyticsClient {
        self.analytics.as_ref()
    }

    /// Shared handle to the analytics group, for work that outlives a borrow
    pub fn analytics_handle(&self) -> Arc<dyn AnalyticsClient> {
        self.analytics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_service::MemoryEventSink;
    use datastore::Repository;
    use domain::{ProviderError, VideoQuery};
    use serde_json::Map;

    fn instant_config(backend: BackendKind) -> ProviderConfig {
        ProviderConfig {
            backend,
            latency_scale: 0.0,
            seed: Some(5),
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn mock_provider_serves_catalog_and_session() {
        let sink = Arc::new(MemoryEventSink::new());
        let provider = DataProvider::from_config(&instant_config(BackendKind::Mock), sink.clone());
        assert_eq!(provider.kind(), BackendKind::Mock);

        let page = provider.videos().get_videos(&VideoQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total, 36);

        let session = provider.auth().get_current_user().await.unwrap();
        assert_eq!(session.user.id, "current_user_1");

        provider
            .analytics()
            .track_event("page_view", Map::new())
            .await
            .unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0].session_id, datastore::MOCK_SESSION_ID);
    }

    #[tokio::test]
    async fn signed_out_mock_reports_unauthenticated() {
        let config = ProviderConfig {
            signed_in: false,
            ..instant_config(BackendKind::Mock)
        };
        let provider = DataProvider::from_config(&config, Arc::new(MemoryEventSink::new()));
        let err = provider.auth().get_current_user().await.unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn remote_backend_rejects_every_call() {
        let sink = Arc::new(MemoryEventSink::new());
        let provider = DataProvider::from_config(&instant_config(BackendKind::Remote), sink.clone());
        assert_eq!(provider.kind(), BackendKind::Remote);

        let not_implemented = |result: Result<(), ProviderError>| {
            assert!(matches!(result, Err(ProviderError::NotImplemented(_))));
        };

        not_implemented(provider.auth().get_current_user().await.map(drop));
        not_implemented(provider.auth().login("a@b.c", "pw").await.map(drop));
        not_implemented(provider.auth().register("a@b.c", "pw", "u").await.map(drop));
        not_implemented(provider.auth().logout().await.map(drop));
        not_implemented(provider.videos().get_popular_videos(24).await.map(drop));
        not_implemented(provider.videos().get_videos(&VideoQuery::default()).await.map(drop));
        not_implemented(provider.videos().get_video("1").await.map(drop));
        not_implemented(provider.videos().search_videos("gam", 1, 24).await.map(drop));
        not_implemented(provider.videos().get_search_suggestions("gam").await.map(drop));
        not_implemented(provider.videos().get_comments("1").await.map(drop));
        not_implemented(provider.videos().get_filters().await.map(drop));
        not_implemented(provider.analytics().track_event("x", Map::new()).await.map(drop));
        not_implemented(provider.analytics().track_batch_events(Vec::new()).await.map(drop));

        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn mock_backend_exposes_its_network() {
        let backend = MockBackend::from_config(
            &instant_config(BackendKind::Mock),
            Arc::new(MemoryEventSink::new()),
        );
        let provider = DataProvider::new(&backend);
        provider.videos().get_video("1").await.unwrap();
        assert_eq!(backend.network().requests_issued(), 1);
        assert_eq!(backend.repository().get_videos().len(), 36);
    }
}
