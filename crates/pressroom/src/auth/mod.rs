//! Session lifecycle on top of a delegated identity provider.
//!
//! The session manager owns the token set, rebuilds the user profile from
//! access-token claims, feeds the current token into the transport client,
//! and keeps the session alive with a periodic background refresh. A failed
//! refresh tears the session down so no stale token is ever attached to a
//! request.

mod claims;
mod keycloak;
mod provider;

pub use claims::decode_user;
pub use keycloak::{KeycloakConfig, KeycloakProvider};
pub use provider::{Credentials, IdentityProvider, TokenSet};

use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use pressroom_api::{ApiError, User};
use tokio::task::JoinHandle;

use crate::client::{Client, TokenProvider};

/// How often the background task checks whether the access token needs
/// refreshing.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Refresh is skipped while the access token is still valid for at least
/// this long.
pub const MIN_TOKEN_VALIDITY_MS: i64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

struct SessionInner {
    state: SessionState,
    tokens: Option<TokenSet>,
    /// Epoch millis when the access token expires, when known.
    expires_at: Option<i64>,
    user: Option<User>,
}

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    client: Arc<Client>,
    inner: Arc<RwLock<SessionInner>>,
    refresh_interval: Duration,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, client: Arc<Client>) -> Arc<Self> {
        Self::with_refresh_interval(provider, client, REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(
        provider: Arc<dyn IdentityProvider>,
        client: Arc<Client>,
        refresh_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            client,
            inner: Arc::new(RwLock::new(SessionInner {
                state: SessionState::Unauthenticated,
                tokens: None,
                expires_at: None,
                user: None,
            })),
            refresh_interval,
            refresh_task: Mutex::new(None),
        })
    }

    /// Try to resume a previous session. No-op when the provider has
    /// nothing to recover.
    pub async fn init(self: &Arc<Self>) -> Result<(), ApiError> {
        match self.provider.recover_session().await? {
            Some(tokens) => {
                self.adopt_tokens(tokens)?;
                tracing::info!("session recovered");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn login(
        self: &Arc<Self>,
        credentials: Option<Credentials>,
    ) -> Result<User, ApiError> {
        self.inner.write().unwrap().state = SessionState::Authenticating;

        match self.provider.login(credentials).await {
            Ok(tokens) => {
                let user = self.adopt_tokens(tokens)?;
                tracing::info!(user = %user.username, "logged in");
                Ok(user)
            }
            Err(err) => {
                self.force_unauthenticated();
                Err(err)
            }
        }
    }

    /// End the session. The provider call is best effort; local state and
    /// the transport token are cleared unconditionally.
    pub async fn logout(self: &Arc<Self>) {
        let refresh_token = {
            let inner = self.inner.read().unwrap();
            inner.tokens.as_ref().and_then(|t| t.refresh_token.clone())
        };
        if let Err(err) = self.provider.logout(refresh_token.as_deref()).await {
            tracing::warn!(error = %err, "provider logout failed");
        }
        self.force_unauthenticated();
        tracing::info!("logged out");
    }

    /// Exchange the refresh token for a new token set.
    ///
    /// A refresh failure is terminal for the session: all local state and
    /// the transport token are dropped before the error is returned.
    pub async fn refresh(self: &Arc<Self>) -> Result<(), ApiError> {
        let refresh_token = {
            let inner = self.inner.read().unwrap();
            inner.tokens.as_ref().and_then(|t| t.refresh_token.clone())
        };
        let Some(refresh_token) = refresh_token else {
            return Err(ApiError::Unauthorized {
                message: "no refresh token held".to_string(),
            });
        };

        match self.provider.refresh(&refresh_token).await {
            Ok(tokens) => {
                self.adopt_tokens(tokens)?;
                tracing::debug!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed; dropping session");
                self.force_unauthenticated();
                Err(err)
            }
        }
    }

    /// Refresh only when the access token is within the minimum validity
    /// window (or has no known expiry).
    pub async fn refresh_if_needed(self: &Arc<Self>) -> Result<(), ApiError> {
        let needs_refresh = {
            let inner = self.inner.read().unwrap();
            if inner.state != SessionState::Authenticated {
                return Ok(());
            }
            match inner.expires_at {
                Some(expires_at) => {
                    expires_at - pressroom_api::now_millis() < MIN_TOKEN_VALIDITY_MS
                }
                None => true,
            }
        };
        if needs_refresh {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().unwrap().state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.read().unwrap().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .tokens
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    fn adopt_tokens(self: &Arc<Self>, tokens: TokenSet) -> Result<User, ApiError> {
        let user = decode_user(&tokens.access_token)?;
        {
            let mut inner = self.inner.write().unwrap();
            inner.expires_at = tokens
                .expires_in
                .map(|secs| pressroom_api::now_millis() + secs * 1000);
            inner.tokens = Some(tokens);
            inner.user = Some(user.clone());
            inner.state = SessionState::Authenticated;
        }
        self.client
            .set_auth(Some(Arc::new(SessionTokenProvider {
                inner: self.inner.clone(),
            })));
        self.arm_refresh();
        Ok(user)
    }

    fn force_unauthenticated(&self) {
        {
            let mut inner = self.inner.write().unwrap();
            inner.state = SessionState::Unauthenticated;
            inner.tokens = None;
            inner.expires_at = None;
            inner.user = None;
        }
        self.client.set_auth(None);
        if let Some(task) = self.refresh_task.lock().unwrap().take() {
            task.abort();
        }
    }

    /// Start (or restart) the periodic refresh task. Holds only a weak
    /// reference so a dropped manager stops refreshing on its own.
    fn arm_refresh(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let interval = self.refresh_interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                let Some(session) = weak.upgrade() else {
                    return;
                };
                // refresh() already tears the session down on failure.
                let _ = session.refresh_if_needed().await;
            }
        });

        let mut slot = self.refresh_task.lock().unwrap();
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }
}

/// Token source installed into the client; reads the *latest* token on
/// every call, so refreshed tokens take effect immediately.
struct SessionTokenProvider {
    inner: Arc<RwLock<SessionInner>>,
}

impl TokenProvider for SessionTokenProvider {
    fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .tokens
            .as_ref()
            .map(|t| t.access_token.clone())
    }
}
