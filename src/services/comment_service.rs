use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::database::models::comment::{Comment, NewComment};
use crate::database::Store;

use super::error::{ServiceError, ServiceResult};
use super::identity_service::{IdentityService, MAX_EMAIL_LEN};

/// Longest comment text the comment table accepts
pub const MAX_COMMENT_LEN: usize = 200;

/// Body of `POST /post_comment`. The text field is named `comments` on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostCommentRequest {
    pub comments: Option<String>,
    pub email: Option<String>,
}

/// Owns comment records; asks the identity service for caller roles
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
    identity: IdentityService,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>, identity: IdentityService) -> Self {
        Self { store, identity }
    }

    /// Store a comment. Posting is anonymous; `email` need not belong to a user.
    pub async fn post_comment(&self, request: PostCommentRequest) -> ServiceResult<Comment> {
        let comment = request.comments.filter(|c| !c.is_empty());
        let email = request.email.filter(|e| !e.is_empty());
        let (Some(comment), Some(email)) = (comment, email) else {
            return Err(ServiceError::validation("Comment text and email are required"));
        };

        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(ServiceError::validation(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LEN
            )));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(ServiceError::validation(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LEN
            )));
        }

        let stored = self.store.insert_comment(NewComment { comment, email }).await?;
        info!("Comment {} posted by {}", stored.id, stored.email);
        Ok(stored)
    }

    /// All comments, most recent first
    pub async fn list_comments(&self, _caller: &AuthUser) -> ServiceResult<Vec<Comment>> {
        Ok(self.store.list_comments().await?)
    }

    pub async fn get_comment(&self, _caller: &AuthUser, id: i64) -> ServiceResult<Comment> {
        self.store
            .find_comment(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))
    }

    /// Remove a comment. Admins and moderators only; unknown ids succeed.
    pub async fn delete_comment(&self, caller: &AuthUser, id: i64) -> ServiceResult<()> {
        match self.identity.caller_role(caller).await? {
            Some(role) if role.can_moderate() => {}
            _ => {
                warn!("Denied comment deletion to {}", caller.email);
                return Err(ServiceError::permission_denied());
            }
        }

        let removed = self.store.delete_comment(id).await?;
        info!("{} deleted comment {} ({} row(s))", caller.email, id, removed);
        Ok(())
    }
}
