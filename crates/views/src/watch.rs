//! The playback page for `/watch?v=<id>`.

use crate::engagement::{CommentError, CommentThread, Engagement, overlay_count};
use crate::gate::{AuthPrompt, GatedAction, require_session};
use crate::player::PlaybackControls;
use chrono::{DateTime, Utc};
use domain::{Comment, CommentAuthor, ProviderError, Session, Video};
use provider::DataProvider;
use serde::Serialize;
use std::sync::Arc;

pub enum WatchState {
    NotFound,
    Ready(Box<WatchPage>),
}

impl WatchState {
    pub fn page(&self) -> Option<&WatchPage> {
        match self {
            WatchState::Ready(page) => Some(page),
            WatchState::NotFound => None,
        }
    }
}

/// Fetches the video and its comments. Any failure to get the video shows
/// the not-found state; missing comments only leave the thread empty.
pub async fn load_watch_page(
    provider: &DataProvider,
    video_id: &str,
    session: Option<Arc<Session>>,
) -> WatchState {
    let video = match provider.videos().get_video(video_id).await {
        Ok(video) => video,
        Err(ProviderError::NotFound(_)) => {
            tracing::debug!(video_id, "Video not found");
            return WatchState::NotFound;
        }
        Err(err) => {
            tracing::warn!(video_id, error = %err, "Failed to load video");
            return WatchState::NotFound;
        }
    };
    let comments = provider
        .videos()
        .get_comments(video_id)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(video_id, error = %err, "Failed to load comments");
            Vec::new()
        });
    WatchState::Ready(Box::new(WatchPage::new(video, comments, session)))
}

pub struct WatchPage {
    video: Video,
    session: Option<Arc<Session>>,
    engagement: Engagement,
    comments: CommentThread,
    controls: PlaybackControls,
    prompt: Option<AuthPrompt>,
}

impl WatchPage {
    pub fn new(video: Video, comments: Vec<Comment>, session: Option<Arc<Session>>) -> Self {
        let mut controls = PlaybackControls::new();
        controls.set_duration(f64::from(video.duration));
        Self {
            video,
            session,
            engagement: Engagement::default(),
            comments: CommentThread::new(comments),
            controls,
            prompt: None,
        }
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn engagement(&self) -> Engagement {
        self.engagement
    }

    pub fn comments(&self) -> &CommentThread {
        &self.comments
    }

    pub fn controls(&self) -> &PlaybackControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut PlaybackControls {
        &mut self.controls
    }

    /// The sign-in prompt currently shown, if any
    pub fn prompt(&self) -> Option<AuthPrompt> {
        self.prompt
    }

    pub fn dismiss_prompt(&mut self) {
        self.prompt = None;
    }

    /// Follows sign-in changes from the session store
    pub fn set_session(&mut self, session: Option<Arc<Session>>) {
        self.session = session;
    }

    fn gate(&mut self, intent: GatedAction) -> Result<(), AuthPrompt> {
        match require_session(self.session.as_deref(), intent) {
            Ok(_) => {
                self.prompt = None;
                Ok(())
            }
            Err(prompt) => {
                self.prompt = Some(prompt);
                Err(prompt)
            }
        }
    }

    pub fn like(&mut self) -> Result<(), AuthPrompt> {
        self.gate(GatedAction::Like)?;
        self.engagement.toggle_like();
        Ok(())
    }

    pub fn dislike(&mut self) -> Result<(), AuthPrompt> {
        self.gate(GatedAction::Dislike)?;
        self.engagement.toggle_dislike();
        Ok(())
    }

    pub fn follow(&mut self) -> Result<(), AuthPrompt> {
        self.gate(GatedAction::Follow)?;
        self.engagement.toggle_follow();
        Ok(())
    }

    pub fn set_comment_draft(&mut self, draft: impl Into<String>) {
        self.comments.set_draft(draft);
    }

    pub fn submit_comment(&mut self) -> Result<&Comment, CommentError> {
        let result = self.comments.submit(self.session.as_deref());
        match &result {
            Ok(_) => self.prompt = None,
            Err(CommentError::AuthRequired(prompt)) => self.prompt = Some(*prompt),
            Err(_) => {}
        }
        result
    }

    pub fn toggle_comment_like(&mut self, comment_id: &str) -> bool {
        self.comments.toggle_like(comment_id)
    }

    pub fn displayed_like_count(&self) -> u64 {
        overlay_count(self.video.like_count, self.engagement.liked)
    }

    pub fn displayed_dislike_count(&self) -> u64 {
        overlay_count(self.video.dislike_count, self.engagement.disliked)
    }

    pub fn displayed_follower_count(&self) -> u64 {
        overlay_count(
            self.video.author.follower_count.unwrap_or(0),
            self.engagement.followed,
        )
    }

    pub fn view(&self) -> WatchView {
        WatchView {
            video: self.video.clone(),
            signed_in: self.session.is_some(),
            engagement: self.engagement,
            like_count: self.displayed_like_count(),
            dislike_count: self.displayed_dislike_count(),
            follower_count: self.displayed_follower_count(),
            comments: self
                .comments
                .comments()
                .iter()
                .map(|comment| CommentView::new(comment, &self.comments))
                .collect(),
            comment_draft: self.comments.draft().to_string(),
            prompt: self.prompt.map(PromptView::from),
            controls: self.controls.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchView {
    pub video: Video,
    pub signed_in: bool,
    pub engagement: Engagement,
    pub like_count: u64,
    pub dislike_count: u64,
    pub follower_count: u64,
    pub comments: Vec<CommentView>,
    pub comment_draft: String,
    pub prompt: Option<PromptView>,
    pub controls: PlaybackControls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub author: CommentAuthor,
    pub content: String,
    pub like_count: u64,
    pub liked: bool,
    pub published_at: DateTime<Utc>,
    pub replies: Vec<CommentView>,
}

impl CommentView {
    fn new(comment: &Comment, thread: &CommentThread) -> Self {
        let liked = thread.is_liked(&comment.id);
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            like_count: overlay_count(comment.like_count, liked),
            liked,
            published_at: comment.published_at,
            replies: comment
                .replies
                .iter()
                .map(|reply| CommentView::new(reply, thread))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub intent: GatedAction,
    pub message: &'static str,
}

impl From<AuthPrompt> for PromptView {
    fn from(prompt: AuthPrompt) -> Self {
        Self {
            intent: prompt.intent,
            message: prompt.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_provider, session};
    use provider::RemoteBackend;

    async fn ready(id: &str, signed_in: bool) -> Box<WatchPage> {
        let (provider, _) = mock_provider();
        let session = signed_in.then(|| Arc::new(session()));
        match load_watch_page(&provider, id, session).await {
            WatchState::Ready(page) => page,
            WatchState::NotFound => panic!("video {id} should exist"),
        }
    }

    #[tokio::test]
    async fn loads_video_and_seeded_comments() {
        let page = ready("1", true).await;
        assert_eq!(page.video().id, "1");
        assert_eq!(page.comments().len(), 3);
        assert_eq!(page.comments().comments()[0].id, "1-c1");
        assert_eq!(page.controls().duration, f64::from(page.video().duration));
    }

    #[tokio::test]
    async fn unknown_or_unreachable_video_is_not_found() {
        let (provider, _) = mock_provider();
        let state = load_watch_page(&provider, "nope", None).await;
        assert!(matches!(state, WatchState::NotFound));

        let remote = DataProvider::new(&RemoteBackend::new());
        assert!(load_watch_page(&remote, "1", None).await.page().is_none());
    }

    #[tokio::test]
    async fn like_then_dislike_restores_like_count() {
        let mut page = ready("2", true).await;
        let base = page.video().like_count;

        page.like().unwrap();
        assert_eq!(page.displayed_like_count(), base + 1);

        page.dislike().unwrap();
        assert!(!page.engagement().liked);
        assert!(page.engagement().disliked);
        assert_eq!(page.displayed_like_count(), base);
        assert_eq!(page.displayed_dislike_count(), page.video().dislike_count + 1);
    }

    #[tokio::test]
    async fn signed_out_actions_prompt_with_intent() {
        let mut page = ready("2", false).await;
        assert_eq!(page.like().unwrap_err().intent, GatedAction::Like);
        assert_eq!(page.dislike().unwrap_err().intent, GatedAction::Dislike);
        assert_eq!(page.follow().unwrap_err().intent, GatedAction::Follow);
        assert_eq!(page.prompt().unwrap().intent, GatedAction::Follow);
        assert_eq!(page.engagement(), Engagement::default());

        page.dismiss_prompt();
        assert!(page.prompt().is_none());
    }

    #[tokio::test]
    async fn signed_out_comment_never_appends() {
        let mut page = ready("4", false).await;
        page.set_comment_draft("first!");
        let err = page.submit_comment().unwrap_err();
        assert!(matches!(err, CommentError::AuthRequired(_)));
        assert_eq!(page.prompt().unwrap().intent, GatedAction::Comment);
        assert_eq!(page.comments().len(), 3);
        assert_eq!(page.comments().draft(), "first!");
    }

    #[tokio::test]
    async fn signed_in_comment_prepends_once() {
        let mut page = ready("4", true).await;
        page.set_comment_draft("clean ace");
        let id = page.submit_comment().unwrap().id.clone();

        assert_eq!(page.comments().len(), 4);
        assert_eq!(page.comments().comments()[0].id, id);
        assert_eq!(page.comments().comments()[0].content, "clean ace");
        assert_eq!(page.comments().draft(), "");
        assert!(page.prompt().is_none());
    }

    #[tokio::test]
    async fn signing_in_later_unlocks_actions() {
        let mut page = ready("5", false).await;
        assert!(page.follow().is_err());
        page.set_session(Some(Arc::new(session())));
        page.follow().unwrap();
        assert!(page.engagement().followed);
        let base = page.video().author.follower_count.unwrap_or(0);
        assert_eq!(page.displayed_follower_count(), base + 1);
    }

    #[tokio::test]
    async fn prompt_clears_once_an_action_goes_through() {
        let mut page = ready("5", false).await;
        assert!(page.like().is_err());
        assert!(page.prompt().is_some());
        page.set_session(Some(Arc::new(session())));
        page.follow().unwrap();
        assert!(page.prompt().is_none());

        page.set_session(None);
        page.set_comment_draft("first!");
        assert!(page.submit_comment().is_err());
        assert!(page.prompt().is_some());
        page.set_session(Some(Arc::new(session())));
        page.submit_comment().unwrap();
        assert!(page.prompt().is_none());
    }

    #[tokio::test]
    async fn view_reflects_overlays() {
        let mut page = ready("1", true).await;
        page.like().unwrap();
        page.toggle_comment_like("1-c2-r1");

        let view = page.view();
        assert_eq!(view.like_count, page.video().like_count + 1);
        let reply = &view.comments[1].replies[0];
        assert!(reply.liked);
        assert_eq!(reply.id, "1-c2-r1");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["signedIn"], true);
        assert!(json["prompt"].is_null());
    }
}
