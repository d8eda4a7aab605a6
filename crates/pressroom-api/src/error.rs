use serde::{Deserialize, Serialize};

/// Structured error types for data-layer operations.
///
/// Every fault surfaced by handlers, repositories, views, or the auth
/// session is translated into this taxonomy. Errors are serializable so
/// they can cross a transport boundary intact.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// User-facing message for display next to a failed view.
    ///
    /// Validation and conflict errors carry actionable text of their own;
    /// the rest map to fixed phrasings.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "The requested resource was not found.".to_string(),
            Self::Validation { message } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::Unauthorized { .. } => {
                "You are not authorized to perform this action.".to_string()
            }
            Self::Forbidden { .. } => "Access forbidden.".to_string(),
            Self::Network { .. } => {
                "Network error. Please check your connection and try again.".to_string()
            }
            Self::Internal { message } => message.clone(),
        }
    }
}
