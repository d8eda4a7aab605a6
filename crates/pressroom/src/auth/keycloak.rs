//! Keycloak adapter for the identity-provider trait.
//!
//! Uses the direct-access (password) grant against the realm token
//! endpoint. The library process has no browser, so there is no redirect
//! flow and no session cookie to recover from.

use async_trait::async_trait;
use pressroom_api::ApiError;
use serde::Deserialize;

use super::provider::{Credentials, IdentityProvider, TokenSet};

#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    pub base_url: String,
    pub realm: String,
    pub client_id: String,
}

impl KeycloakConfig {
    /// Read `KEYCLOAK_URL`, `KEYCLOAK_REALM` and `KEYCLOAK_CLIENT_ID`.
    ///
    /// # Errors
    ///
    /// `Internal` naming the first missing variable; configuration problems
    /// should stop startup, not surface later as auth failures.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = Self {
            base_url: require_env("KEYCLOAK_URL")?,
            realm: require_env("KEYCLOAK_REALM")?,
            client_id: require_env("KEYCLOAK_CLIENT_ID")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.base_url.trim().is_empty() || self.realm.trim().is_empty() {
            return Err(ApiError::internal(
                "keycloak configuration is incomplete: base_url and realm are required",
            ));
        }
        Ok(())
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url.trim_end_matches('/'),
            self.realm
        )
    }

    fn logout_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/logout",
            self.base_url.trim_end_matches('/'),
            self.realm
        )
    }
}

fn require_env(name: &'static str) -> Result<String, ApiError> {
    std::env::var(name)
        .map_err(|_| ApiError::internal(format!("missing environment variable: {name}")))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl From<TokenResponse> for TokenSet {
    fn from(r: TokenResponse) -> Self {
        TokenSet {
            access_token: r.access_token,
            refresh_token: r.refresh_token,
            expires_in: r.expires_in,
        }
    }
}

pub struct KeycloakProvider {
    config: KeycloakConfig,
    http: reqwest::Client,
}

impl KeycloakProvider {
    pub fn new(config: KeycloakConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn token_grant(&self, params: &[(&str, &str)]) -> Result<TokenSet, ApiError> {
        let response = self
            .http
            .post(self.config.token_endpoint())
            .form(params)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST
        {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized {
                message: format!("token request rejected: {body}"),
            });
        }
        if !status.is_success() {
            return Err(ApiError::internal(format!(
                "token endpoint returned {status}"
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::internal(format!("malformed token response: {e}")))?;
        Ok(tokens.into())
    }
}

#[async_trait]
impl IdentityProvider for KeycloakProvider {
    async fn recover_session(&self) -> Result<Option<TokenSet>, ApiError> {
        Ok(None)
    }

    async fn login(&self, credentials: Option<Credentials>) -> Result<TokenSet, ApiError> {
        let credentials = credentials.ok_or_else(|| {
            ApiError::validation("username and password are required for login")
        })?;
        self.token_grant(&[
            ("grant_type", "password"),
            ("client_id", &self.config.client_id),
            ("username", &credentials.username),
            ("password", &credentials.password),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, ApiError> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("client_id", &self.config.client_id),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), ApiError> {
        let Some(refresh_token) = refresh_token else {
            return Ok(());
        };
        let result = self
            .http
            .post(self.config.logout_endpoint())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await;

        if let Err(e) = result {
            tracing::warn!(error = %e, "keycloak logout failed; clearing session locally anyway");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> KeycloakConfig {
        KeycloakConfig {
            base_url: "https://id.example.com/".to_string(),
            realm: "pressroom".to_string(),
            client_id: "admin-panel".to_string(),
        }
    }

    #[test]
    fn endpoints_follow_the_realm_layout() {
        let config = config();
        assert_eq!(
            config.token_endpoint(),
            "https://id.example.com/realms/pressroom/protocol/openid-connect/token"
        );
        assert_eq!(
            config.logout_endpoint(),
            "https://id.example.com/realms/pressroom/protocol/openid-connect/logout"
        );
    }

    #[test]
    fn blank_config_is_rejected() {
        let bad = KeycloakConfig {
            base_url: "  ".to_string(),
            ..config()
        };
        assert!(bad.validate().is_err());
    }
}
