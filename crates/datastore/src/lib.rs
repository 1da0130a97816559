use domain::{Comment, FilterCategory, FilterEntry, Session, Video};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

mod dataset;
mod network;

pub use dataset::{MOCK_SESSION_ID, mock_user};
pub use network::{MAX_DELAY, MAX_LATENCY_SCALE, NetworkSimulator};

/// Repository trait for data access abstraction
/// This allows switching between different storage backends (in-memory, filesystem, database)
pub trait Repository: Send + Sync {
    /// Get a video by ID
    fn get_video(&self, id: &str) -> Option<Video>;

    /// Get all videos, in catalog order
    fn get_videos(&self) -> Vec<Video>;

    /// Get the comment thread of a video, newest-first
    fn get_comments(&self, video_id: &str) -> Vec<Comment>;

    /// Add a video to the repository, replacing any video with the same ID
    fn add_video(&self, video: Video);

    /// Add a top-level comment to a video's thread
    fn add_comment(&self, video_id: &str, comment: Comment);

    /// The session currently signed in, if any
    fn current_session(&self) -> Option<Session>;

    /// Replace the current session
    fn set_current_session(&self, session: Option<Session>);

    /// Filter pills with the counts they advertise
    fn filter_entries(&self) -> Vec<FilterEntry>;
}

/// In-memory implementation of the Repository trait
pub struct InMemoryRepository {
    videos: Arc<RwLock<Vec<Video>>>,
    comments: Arc<RwLock<HashMap<String, Vec<Comment>>>>,
    session: Arc<RwLock<Option<Session>>>,
}

impl InMemoryRepository {
    /// Create a new in-memory repository with the mock catalog
    pub fn new() -> Self {
        Self::with_rng(&mut StdRng::from_entropy())
    }

    /// Create a repository whose generated videos are reproducible.
    ///
    /// The seed fixes ids, view/like/dislike counts, durations and publish
    /// ages. Descriptions come from `fake` on its own thread RNG and differ
    /// between runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Create a repository without any data
    pub fn empty() -> Self {
        Self {
            videos: Arc::new(RwLock::new(Vec::new())),
            comments: Arc::new(RwLock::new(HashMap::new())),
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn with_rng(rng: &mut StdRng) -> Self {
        let repo = Self::empty();
        for video in dataset::mock_videos(rng) {
            for comment in dataset::mock_comments(&video).into_iter().rev() {
                repo.add_comment(&video.id, comment);
            }
            repo.add_video(video);
        }
        tracing::debug!(videos = repo.get_videos().len(), "Populated mock catalog");
        repo
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for InMemoryRepository {
    fn get_video(&self, id: &str) -> Option<Video> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .iter()
            .find(|video| video.id == id)
            .cloned()
    }

    fn get_videos(&self) -> Vec<Video> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .clone()
    }

    fn get_comments(&self, video_id: &str) -> Vec<Comment> {
        self.comments
            .read()
            .expect("Failed to acquire read lock on comments")
            .get(video_id)
            .cloned()
            .unwrap_or_default()
    }

    fn add_video(&self, video: Video) {
        let mut videos = self
            .videos
            .write()
            .expect("Failed to acquire write lock on videos");
        match videos.iter_mut().find(|existing| existing.id == video.id) {
            Some(existing) => *existing = video,
            None => videos.push(video),
        }
    }

    fn add_comment(&self, video_id: &str, comment: Comment) {
        self.comments
            .write()
            .expect("Failed to acquire write lock on comments")
            .entry(video_id.to_string())
            .or_default()
            .insert(0, comment);
    }

    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .expect("Failed to acquire read lock on session")
            .clone()
    }

    fn set_current_session(&self, session: Option<Session>) {
        *self
            .session
            .write()
            .expect("Failed to acquire write lock on session") = session;
    }

    fn filter_entries(&self) -> Vec<FilterEntry> {
        let total = self
            .videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .len() as u32;
        FilterCategory::ALL
            .into_iter()
            .map(|category| FilterEntry {
                id: category,
                label: category.label().to_string(),
                count: dataset::advertised_count(category, total),
            })
            .collect()
    }
}
