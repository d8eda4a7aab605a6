//! Application configuration, read once at startup.
//!
//! Every section validates eagerly so a misconfigured deployment fails at
//! boot with an actionable message instead of at the first auth or upload
//! attempt.

use pressroom_api::ApiError;

use crate::auth::KeycloakConfig;
use crate::media::MediaConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub keycloak: KeycloakConfig,
    pub media: MediaConfig,
}

impl Config {
    /// Assemble the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// `Internal` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self {
            keycloak: KeycloakConfig::from_env()?,
            media: MediaConfig::from_env()?,
        })
    }
}
