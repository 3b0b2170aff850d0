use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::comment::{Comment, NewComment};
use super::models::user::{NewUser, User};

/// Persistence operations backing the identity and comment services.
///
/// Each call is atomic on its own. Implementations must enforce email
/// uniqueness on `insert_user`, reporting a clash as [`DatabaseError::Duplicate`].
#[async_trait]
pub trait Store: Send + Sync {
    // User operations
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    /// Returns the number of rows changed
    async fn update_user_role(&self, email: &str, role: &str) -> Result<u64, DatabaseError>;
    async fn delete_user(&self, email: &str) -> Result<u64, DatabaseError>;

    // Comment operations
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError>;
    /// Most recent first
    async fn list_comments(&self) -> Result<Vec<Comment>, DatabaseError>;
    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError>;
    async fn delete_comment(&self, id: i64) -> Result<u64, DatabaseError>;

    // Utility
    async fn migrate(&self) -> Result<(), DatabaseError>;
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
