use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;

/// Outcome kinds of identity and comment operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Unique key already taken
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or bad/missing token
    #[error("{0}")]
    Authentication(String),

    /// Valid identity with insufficient role
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// Unexpected persistence failure
    #[error("{0}")]
    Storage(String),

    /// Hashing or token signing failure
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn permission_denied() -> Self {
        ServiceError::Authorization("Permission denied".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ServiceError::Authentication("Invalid credentials".to_string())
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate(_) => ServiceError::Conflict("User already exists".to_string()),
            other => {
                tracing::error!("Storage error: {}", other);
                ServiceError::Storage(other.to_string())
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ServiceError::Internal("Failed to process credentials".to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken(msg) => ServiceError::Authentication(format!("Invalid token: {}", msg)),
            JwtError::TokenGeneration(msg) => {
                tracing::error!("Token generation error: {}", msg);
                ServiceError::Internal("Failed to issue access token".to_string())
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
