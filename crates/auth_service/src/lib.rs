use async_trait::async_trait;
use chrono::{DateTime, Utc};
use datastore::{NetworkSimulator, Repository};
use domain::{Ack, Profile, ProviderError, Session, TokenBundle, User};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Lifetime of issued access tokens, in seconds
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

const LOGIN_LATENCY: Duration = Duration::from_millis(800);
const REGISTER_LATENCY: Duration = Duration::from_millis(1000);
const LOGOUT_LATENCY: Duration = Duration::from_millis(200);
const DEFAULT_AVATAR_URL: &str =
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=150";

/// The `auth` capability group of a data provider
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Resolves with the active session, or fails with
    /// [`ProviderError::Unauthenticated`] when nobody is signed in.
    async fn get_current_user(&self) -> Result<Session, ProviderError>;

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, ProviderError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<TokenBundle, ProviderError>;

    /// Ends the session. Succeeds when nobody is signed in as well.
    async fn logout(&self) -> Result<Ack, ProviderError>;
}

/// Token metadata for tracking expiry
#[derive(Debug, Clone)]
struct TokenMetadata {
    /// When the token was issued
    issued_at: DateTime<Utc>,
    /// Expiry duration in seconds
    expires_in: i64,
}

impl TokenMetadata {
    /// Check if the token is expired
    fn is_expired(&self) -> bool {
        let expiry_time = self.issued_at + chrono::Duration::seconds(self.expires_in);
        Utc::now() >= expiry_time
    }
}

/// Rejects credentials that could never belong to an account.
///
/// The mock backend keeps no passwords, so anything passing this check is
/// accepted.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ProviderError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ProviderError::InvalidCredentials(
            "email is required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(ProviderError::InvalidCredentials(format!(
            "'{}' is not an email address",
            email
        )));
    }
    if password.trim().is_empty() {
        return Err(ProviderError::InvalidCredentials(
            "password is required".to_string(),
        ));
    }
    Ok(())
}

/// Auth client backed by the in-memory repository
pub struct MockAuthClient {
    repo: Arc<dyn Repository>,
    network: NetworkSimulator,
    tokens: RwLock<HashMap<String, TokenMetadata>>,
}

impl MockAuthClient {
    pub fn new(repo: Arc<dyn Repository>, network: NetworkSimulator) -> Self {
        Self {
            repo,
            network,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `token` was issued by this client, has not been revoked by a
    /// logout, and has not expired.
    pub fn is_token_active(&self, token: &str) -> bool {
        self.tokens
            .read()
            .expect("Failed to acquire read lock on tokens")
            .get(token)
            .is_some_and(|metadata| !metadata.is_expired())
    }

    fn issue_tokens(&self) -> TokenBundle {
        let access_token = format!("mock_access_{}", uuid::Uuid::new_v4().simple());
        let refresh_token = format!("mock_refresh_{}", uuid::Uuid::new_v4().simple());

        let metadata = TokenMetadata {
            issued_at: Utc::now(),
            expires_in: DEFAULT_EXPIRES_IN,
        };
        {
            let mut store = self
                .tokens
                .write()
                .expect("Failed to acquire write lock on tokens");
            store.insert(access_token.clone(), metadata.clone());
            store.insert(refresh_token.clone(), metadata);
        }

        TokenBundle {
            access_token,
            refresh_token,
            expires_in: DEFAULT_EXPIRES_IN,
            token_type: "Bearer".to_string(),
        }
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn get_current_user(&self) -> Result<Session, ProviderError> {
        self.repo
            .current_session()
            .ok_or(ProviderError::Unauthenticated)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, ProviderError> {
        self.network.round_trip("auth.login", LOGIN_LATENCY).await?;
        validate_credentials(email, password)?;

        // The mock backend has exactly one account
        let session = datastore::mock_user();
        tracing::info!(username = %session.user.username, "Signed in");
        self.repo.set_current_session(Some(session));
        Ok(self.issue_tokens())
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<TokenBundle, ProviderError> {
        self.network
            .round_trip("auth.register", REGISTER_LATENCY)
            .await?;
        validate_credentials(email, password)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(ProviderError::InvalidCredentials(
                "username is required".to_string(),
            ));
        }

        let now = Utc::now();
        let user_id = format!("user_{}", uuid::Uuid::new_v4().simple());
        let session = Session {
            user: User {
                id: user_id.clone(),
                username: username.to_string(),
                email: email.trim().to_string(),
                created_at: now,
                updated_at: now,
            },
            profile: Profile {
                user_id,
                display_name: username.to_string(),
                avatar_url: DEFAULT_AVATAR_URL.to_string(),
                bio: String::new(),
                created_at: now,
                updated_at: now,
            },
        };
        tracing::info!(username, "Registered new account");
        self.repo.set_current_session(Some(session));
        Ok(self.issue_tokens())
    }

    async fn logout(&self) -> Result<Ack, ProviderError> {
        self.network.round_trip("auth.logout", LOGOUT_LATENCY).await?;
        self.repo.set_current_session(None);
        self.tokens
            .write()
            .expect("Failed to acquire write lock on tokens")
            .clear();
        Ok(Ack::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::InMemoryRepository;

    fn client() -> MockAuthClient {
        MockAuthClient::new(
            Arc::new(InMemoryRepository::empty()),
            NetworkSimulator::instant(),
        )
    }

    #[tokio::test]
    async fn no_session_is_unauthenticated() {
        let err = client().get_current_user().await.unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn login_issues_bearer_tokens_and_signs_in() {
        let auth = client();
        let tokens = auth.login("player@clutch.com", "hunter2").await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, DEFAULT_EXPIRES_IN);
        assert_ne!(tokens.access_token, tokens.refresh_token);
        assert!(auth.is_token_active(&tokens.access_token));

        let session = auth.get_current_user().await.unwrap();
        assert_eq!(session.user.username, "clutch_player_2024");
    }

    #[tokio::test]
    async fn login_rejects_malformed_credentials() {
        let auth = client();
        for (email, password) in [("", "pw"), ("not-an-email", "pw"), ("a@b.c", "  ")] {
            let err = auth.login(email, password).await.unwrap_err();
            assert!(matches!(err, ProviderError::InvalidCredentials(_)));
        }
        assert!(auth.get_current_user().await.is_err());
    }

    #[tokio::test]
    async fn register_creates_session_for_new_username() {
        let auth = client();
        auth.register("new@clutch.com", "secret", " rookie ")
            .await
            .unwrap();

        let session = auth.get_current_user().await.unwrap();
        assert_eq!(session.user.username, "rookie");
        assert_eq!(session.user.email, "new@clutch.com");
        assert_eq!(session.profile.user_id, session.user.id);
    }

    #[tokio::test]
    async fn register_requires_username() {
        let err = client()
            .register("new@clutch.com", "secret", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_revokes_tokens() {
        let auth = client();
        let tokens = auth.login("player@clutch.com", "pw").await.unwrap();

        assert!(auth.logout().await.unwrap().success);
        assert!(auth.logout().await.unwrap().success);
        assert!(!auth.is_token_active(&tokens.access_token));
        assert!(auth.get_current_user().await.is_err());
    }

    #[test]
    fn token_metadata_expiry() {
        let fresh = TokenMetadata {
            issued_at: Utc::now(),
            expires_in: 3600,
        };
        assert!(!fresh.is_expired());

        let stale = TokenMetadata {
            issued_at: Utc::now() - chrono::Duration::seconds(10),
            expires_in: 5,
        };
        assert!(stale.is_expired());
    }

    #[tokio::test]
    async fn login_fails_on_network_failure() {
        let auth = MockAuthClient::new(
            Arc::new(InMemoryRepository::empty()),
            NetworkSimulator::new(0.0, 1.0),
        );
        let err = auth.login("player@clutch.com", "pw").await.unwrap_err();
        assert_eq!(err, ProviderError::NetworkSimulationFailure("auth.login"));
    }
}
