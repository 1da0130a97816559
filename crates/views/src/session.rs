//! Shared holder of the current session.
//!
//! The session is fetched once and handed to every view through a
//! [`SessionStore`]. Views that need to react to sign-in and sign-out
//! subscribe to it instead of polling the provider on their own.

use auth_service::AuthClient;
use domain::{ProviderError, Session, TokenBundle};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Not resolved yet
    Unknown,
    SignedOut,
    SignedIn(Arc<Session>),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }
}

pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { state }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        match &*self.state.borrow() {
            SessionState::SignedIn(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Receiver that observes every later change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn set(&self, state: SessionState) {
        self.state.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    /// Asks the provider who is signed in.
    ///
    /// "Nobody" is a normal answer and yields `Ok(None)`. Any other failure
    /// also leaves the store signed out, but is returned so the caller can
    /// tell it apart from a plain signed-out state.
    pub async fn refresh(
        &self,
        auth: &dyn AuthClient,
    ) -> Result<Option<Arc<Session>>, ProviderError> {
        match auth.get_current_user().await {
            Ok(session) => {
                let session = Arc::new(session);
                self.set(SessionState::SignedIn(session.clone()));
                Ok(Some(session))
            }
            Err(err) if err.is_unauthenticated() => {
                self.set(SessionState::SignedOut);
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not resolve session, treating as signed out");
                self.set(SessionState::SignedOut);
                Err(err)
            }
        }
    }

    pub async fn login(
        &self,
        auth: &dyn AuthClient,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, ProviderError> {
        let tokens = auth.login(email, password).await?;
        self.refresh(auth).await?;
        Ok(tokens)
    }

    pub async fn register(
        &self,
        auth: &dyn AuthClient,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<TokenBundle, ProviderError> {
        let tokens = auth.register(email, password, username).await?;
        self.refresh(auth).await?;
        Ok(tokens)
    }

    pub async fn logout(&self, auth: &dyn AuthClient) -> Result<(), ProviderError> {
        auth.logout().await?;
        self.set(SessionState::SignedOut);
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_provider, signed_out_provider};
    use provider::{DataProvider, RemoteBackend};

    #[tokio::test]
    async fn refresh_resolves_signed_in_session() {
        let (provider, _) = mock_provider();
        let store = SessionStore::new();
        assert_eq!(store.current(), SessionState::Unknown);

        let session = store.refresh(provider.auth()).await.unwrap().unwrap();
        assert_eq!(session.user.username, "clutch_player_2024");
        assert!(store.current().is_signed_in());
    }

    #[tokio::test]
    async fn no_session_is_not_an_error() {
        let (provider, _) = signed_out_provider();
        let store = SessionStore::new();
        assert!(store.refresh(provider.auth()).await.unwrap().is_none());
        assert_eq!(store.current(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn backend_failure_is_reported_but_falls_back_to_signed_out() {
        let provider = DataProvider::new(&RemoteBackend::new());
        let store = SessionStore::new();
        let err = store.refresh(provider.auth()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotImplemented(_)));
        assert_eq!(store.current(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn subscribers_see_login_and_logout() {
        let (provider, _) = signed_out_provider();
        let store = SessionStore::new();
        let mut updates = store.subscribe();

        store
            .login(provider.auth(), "player@clutch.com", "pw")
            .await
            .unwrap();
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_signed_in());

        store.logout(provider.auth()).await.unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn register_signs_in_new_account() {
        let (provider, _) = signed_out_provider();
        let store = SessionStore::new();
        store
            .register(provider.auth(), "new@clutch.com", "pw", "rookie")
            .await
            .unwrap();
        assert_eq!(store.session().unwrap().user.username, "rookie");
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_state() {
        let (provider, _) = signed_out_provider();
        let store = SessionStore::new();
        store.refresh(provider.auth()).await.unwrap();

        let err = store.login(provider.auth(), "bad", "pw").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));
        assert_eq!(store.current(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn unchanged_refresh_does_not_notify() {
        let (provider, _) = mock_provider();
        let store = SessionStore::new();
        store.refresh(provider.auth()).await.unwrap();
        let mut updates = store.subscribe();
        updates.borrow_and_update();

        store.refresh(provider.auth()).await.unwrap();
        assert!(!updates.has_changed().unwrap());
    }
}
