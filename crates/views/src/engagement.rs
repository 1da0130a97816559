//! Local engagement state on the watch page.
//!
//! Nothing here reaches the provider. Likes, follows and new comments are
//! overlays on the fetched data and vanish with the view.

use crate::gate::{AuthPrompt, GatedAction, require_session};
use chrono::Utc;
use domain::{Comment, CommentAuthor, Session};
use serde::Serialize;
use std::collections::HashSet;

/// Count shown for a base value with a local toggle on top
pub fn overlay_count(base: u64, active: bool) -> u64 {
    base + u64::from(active)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub liked: bool,
    pub disliked: bool,
    pub followed: bool,
}

impl Engagement {
    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
        if self.liked {
            self.disliked = false;
        }
    }

    pub fn toggle_dislike(&mut self) {
        self.disliked = !self.disliked;
        if self.disliked {
            self.liked = false;
        }
    }

    pub fn toggle_follow(&mut self) {
        self.followed = !self.followed;
    }
}

fn find_comment<'a>(comments: &'a [Comment], id: &str) -> Option<&'a Comment> {
    comments.iter().find_map(|comment| {
        if comment.id == id {
            Some(comment)
        } else {
            find_comment(&comment.replies, id)
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentError {
    AuthRequired(AuthPrompt),
    EmptyContent,
}

impl std::fmt::Display for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentError::AuthRequired(prompt) => f.write_str(prompt.message()),
            CommentError::EmptyContent => f.write_str("Comment is empty"),
        }
    }
}

impl std::error::Error for CommentError {}

/// Fetched comments plus the viewer's likes and unsent draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    comments: Vec<Comment>,
    liked: HashSet<String>,
    draft: String,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            liked: HashSet::new(),
            draft: String::new(),
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn find(&self, comment_id: &str) -> Option<&Comment> {
        find_comment(&self.comments, comment_id)
    }

    pub fn is_liked(&self, comment_id: &str) -> bool {
        self.liked.contains(comment_id)
    }

    /// Flips the viewer's like on a comment or reply. Returns false for an
    /// unknown id.
    pub fn toggle_like(&mut self, comment_id: &str) -> bool {
        if self.find(comment_id).is_none() {
            return false;
        }
        if !self.liked.remove(comment_id) {
            self.liked.insert(comment_id.to_string());
        }
        true
    }

    pub fn displayed_like_count(&self, comment_id: &str) -> Option<u64> {
        self.find(comment_id)
            .map(|comment| overlay_count(comment.like_count, self.is_liked(comment_id)))
    }

    /// Posts the draft as the signed-in user. The new comment goes to the
    /// top and the draft is cleared.
    pub fn submit(&mut self, session: Option<&Session>) -> Result<&Comment, CommentError> {
        let session =
            require_session(session, GatedAction::Comment).map_err(CommentError::AuthRequired)?;
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }

        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            author: CommentAuthor {
                username: session.user.username.clone(),
                avatar_url: session.profile.avatar_url.clone(),
            },
            content: content.to_string(),
            like_count: 0,
            published_at: Utc::now(),
            replies: Vec::new(),
        };
        tracing::debug!(comment_id = %comment.id, "Posted local comment");
        self.comments.insert(0, comment);
        self.draft.clear();
        Ok(&self.comments[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session;

    fn comment(id: &str, likes: u64, replies: Vec<Comment>) -> Comment {
        Comment {
            id: id.to_string(),
            author: CommentAuthor {
                username: "someone".to_string(),
                avatar_url: "https://example.com/a.png".to_string(),
            },
            content: format!("comment {id}"),
            like_count: likes,
            published_at: Utc::now(),
            replies,
        }
    }

    fn thread() -> CommentThread {
        CommentThread::new(vec![
            comment("a", 10, Vec::new()),
            comment("b", 3, vec![comment("b-r1", 1, Vec::new())]),
        ])
    }

    #[test]
    fn like_and_dislike_exclude_each_other() {
        let mut engagement = Engagement::default();
        engagement.toggle_like();
        assert!(engagement.liked);
        engagement.toggle_dislike();
        assert!(engagement.disliked);
        assert!(!engagement.liked);
        assert_eq!(overlay_count(120, engagement.liked), 120);

        engagement.toggle_like();
        assert!(engagement.liked && !engagement.disliked);
        engagement.toggle_like();
        assert_eq!(engagement, Engagement::default());
    }

    #[test]
    fn follow_toggles() {
        let mut engagement = Engagement::default();
        engagement.toggle_follow();
        assert!(engagement.followed);
        engagement.toggle_follow();
        assert!(!engagement.followed);
    }

    #[test]
    fn comment_like_is_local_overlay() {
        let mut thread = thread();
        assert!(thread.toggle_like("a"));
        assert_eq!(thread.displayed_like_count("a"), Some(11));
        assert!(thread.toggle_like("a"));
        assert_eq!(thread.displayed_like_count("a"), Some(10));
        assert_eq!(thread.displayed_like_count("missing"), None);
    }

    #[test]
    fn reply_likes_are_reachable() {
        let mut thread = thread();
        assert!(thread.toggle_like("b-r1"));
        assert!(thread.is_liked("b-r1"));
        assert!(!thread.is_liked("b"));
        assert_eq!(thread.displayed_like_count("b-r1"), Some(2));
        assert!(!thread.toggle_like("missing"));
    }

    #[test]
    fn signed_out_submit_prompts_and_keeps_thread() {
        let mut thread = thread();
        thread.set_draft("hello");
        let err = thread.submit(None).unwrap_err();
        assert_eq!(
            err,
            CommentError::AuthRequired(AuthPrompt {
                intent: GatedAction::Comment
            })
        );
        assert_eq!(thread.len(), 2);
        assert_eq!(thread.draft(), "hello");
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut thread = thread();
        thread.set_draft("   \n");
        let session = session();
        assert_eq!(
            thread.submit(Some(&session)).unwrap_err(),
            CommentError::EmptyContent
        );
        assert_eq!(thread.len(), 2);
    }

    #[test]
    fn submit_prepends_trimmed_comment() {
        let mut thread = thread();
        let session = session();
        thread.set_draft("  gg wp  ");

        let posted = thread.submit(Some(&session)).unwrap().clone();
        assert_eq!(posted.content, "gg wp");
        assert_eq!(posted.author.username, session.user.username);
        assert_eq!(posted.like_count, 0);
        assert!(posted.replies.is_empty());

        assert_eq!(thread.len(), 3);
        assert_eq!(thread.comments()[0].id, posted.id);
        assert_eq!(thread.comments()[1].id, "a");
        assert_eq!(thread.draft(), "");
    }

    #[test]
    fn posted_comments_get_distinct_ids() {
        let mut thread = CommentThread::default();
        let session = session();
        thread.set_draft("one");
        let first = thread.submit(Some(&session)).unwrap().id.clone();
        thread.set_draft("two");
        let second = thread.submit(Some(&session)).unwrap().id.clone();
        assert_ne!(first, second);
    }
}
