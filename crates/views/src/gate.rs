use domain::Session;
use serde::Serialize;
use std::fmt;

/// Actions that need a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatedAction {
    Like,
    Dislike,
    Follow,
    Comment,
}

impl GatedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatedAction::Like => "like",
            GatedAction::Dislike => "dislike",
            GatedAction::Follow => "follow",
            GatedAction::Comment => "comment",
        }
    }
}

impl fmt::Display for GatedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign-in prompt shown in place of a gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthPrompt {
    pub intent: GatedAction,
}

impl AuthPrompt {
    pub fn message(&self) -> &'static str {
        match self.intent {
            GatedAction::Like => "Sign in to like this video",
            GatedAction::Dislike => "Sign in to let the creator know what you think",
            GatedAction::Follow => "Sign in to follow this channel",
            GatedAction::Comment => "Sign in to join the conversation",
        }
    }
}

/// Lets `intent` through when a session exists, otherwise produces the
/// prompt to show instead.
pub fn require_session(
    session: Option<&Session>,
    intent: GatedAction,
) -> Result<&Session, AuthPrompt> {
    session.ok_or_else(|| {
        tracing::debug!(%intent, "Gated action needs a session");
        AuthPrompt { intent }
    })
}
