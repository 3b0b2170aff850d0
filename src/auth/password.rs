//! Password hashing utilities
//!
//! bcrypt hashes embed their own salt and cost, so only the hash is stored.
//! Hashing is CPU-bound; async callers run it on the blocking pool.

use bcrypt::{hash, verify, BcryptError};

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| PasswordError::Join(e.to_string()))?
        .map_err(PasswordError::from)
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::Join(e.to_string()))?
        .map_err(PasswordError::from)
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] BcryptError),

    #[error("hashing task failed: {0}")]
    Join(String),
}
