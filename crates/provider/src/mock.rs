use crate::{Backend, BackendKind, ProviderConfig};
use analytics_service::{AnalyticsClient, EventSink, MockAnalyticsClient};
use auth_service::{AuthClient, MockAuthClient};
use datastore::{InMemoryRepository, MOCK_SESSION_ID, NetworkSimulator, Repository};
use std::sync::Arc;
use video_service::{MockVideoClient, VideoClient};

/// In-memory backend with simulated latency
pub struct MockBackend {
    repo: Arc<dyn Repository>,
    network: NetworkSimulator,
    auth: Arc<MockAuthClient>,
    videos: Arc<MockVideoClient>,
    analytics: Arc<MockAnalyticsClient>,
}

impl MockBackend {
    pub fn new(
        repo: Arc<dyn Repository>,
        network: NetworkSimulator,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            auth: Arc::new(MockAuthClient::new(repo.clone(), network.clone())),
            videos: Arc::new(MockVideoClient::new(repo.clone(), network.clone())),
            analytics: Arc::new(MockAnalyticsClient::new(sink, MOCK_SESSION_ID)),
            repo,
            network,
        }
    }

    /// Builds the mock catalog and account state described by `config`
    pub fn from_config(config: &ProviderConfig, sink: Arc<dyn EventSink>) -> Self {
        let repo = match config.seed {
            Some(seed) => InMemoryRepository::with_seed(seed),
            None => InMemoryRepository::new(),
        };
        if config.signed_in {
            repo.set_current_session(Some(datastore::mock_user()));
        }
        let network = NetworkSimulator::new(config.latency_scale, config.failure_rate);
        Self::new(Arc::new(repo), network, sink)
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    pub fn network(&self) -> &NetworkSimulator {
        &self.network
    }
}

impl Backend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    fn auth(&self) -> Arc<dyn AuthClient> {
        self.auth.clone()
    }

    fn videos(&self) -> Arc<dyn VideoClient> {
        self.videos.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsClient> {
        self.analytics.clone()
    }
}
