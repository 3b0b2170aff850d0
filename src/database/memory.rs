use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::comment::{Comment, NewComment};
use super::models::user::{NewUser, User};
use super::store::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    comments: Vec<Comment>,
    next_user_id: i64,
    next_comment_id: i64,
}

/// In-memory store for development and testing
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate(user.email));
        }

        tables.next_user_id += 1;
        let stored = User {
            id: tables.next_user_id,
            email: user.email,
            password: user.password_hash,
            role: user.role,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn update_user_role(&self, email: &str, role: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.role = role.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, email: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.email != email);
        Ok((before - tables.users.len()) as u64)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.next_comment_id += 1;
        let stored = Comment {
            id: tables.next_comment_id,
            comment: comment.comment,
            email: comment.email,
            timestamp: Utc::now(),
        };
        tables.comments.push(stored.clone());
        Ok(stored)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, DatabaseError> {
        let mut comments = self.tables.read().await.comments.clone();
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_comment(&self, id: i64) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok((before - tables.comments.len()) as u64)
    }

    async fn migrate(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
