use async_trait::async_trait;
use pressroom_api::ApiError;
use serde::{Deserialize, Serialize};

/// Tokens handed back by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access-token lifetime in seconds, when the provider reports one.
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Delegated identity provider. All credential checking, token issuance and
/// revocation happens on the other side of this trait; the session manager
/// only orchestrates.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Attempt to resume an existing session without user interaction.
    /// `Ok(None)` means no session is available, which is not an error.
    async fn recover_session(&self) -> Result<Option<TokenSet>, ApiError>;

    /// Authenticate. Providers with an interactive flow may ignore the
    /// credentials and drive their own redirect.
    async fn login(&self, credentials: Option<Credentials>) -> Result<TokenSet, ApiError>;

    /// Exchange a refresh token for a fresh token set.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when the refresh token is expired or revoked.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, ApiError>;

    /// Revoke the session server-side. Best effort: callers clear local
    /// state regardless of the outcome.
    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), ApiError>;
}
