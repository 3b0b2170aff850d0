use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::{hash_password, hash_password_blocking, verify_password_blocking};
use crate::auth::{AuthUser, TokenKeys};
use crate::database::models::user::{NewUser, UserSummary};
use crate::database::Store;
use crate::types::Role;

use super::error::{ServiceError, ServiceResult};

/// Longest email the user table accepts
pub const MAX_EMAIL_LEN: usize = 120;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleRequest {
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDirectory {
    pub users: Vec<String>,
    pub current_user: String,
}

/// Returns the value if present and non-empty
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_role(role: &str) -> ServiceResult<Role> {
    role.parse::<Role>()
        .map_err(|e| ServiceError::validation(e.to_string()))
}

/// Owns user records, credentials and token issuance
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn Store>,
    keys: TokenKeys,
    bcrypt_cost: u32,
    /// Verified against when the login email is unknown, so both failures cost one bcrypt check
    dummy_hash: Arc<str>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>, keys: TokenKeys, bcrypt_cost: u32) -> Self {
        let dummy_hash = match hash_password("comment-board-unknown-user", bcrypt_cost) {
            Ok(hash) => Arc::from(hash),
            Err(e) => {
                tracing::error!("Failed to prepare login hash at cost {}: {}", bcrypt_cost, e);
                Arc::from("")
            }
        };

        Self {
            store,
            keys,
            bcrypt_cost,
            dummy_hash,
        }
    }

    /// Create a user with a bcrypt-hashed password and the given (or default) role
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserSummary> {
        let (email, password) = match (required(request.email), required(request.password)) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(ServiceError::validation("Email and password are required")),
        };
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(ServiceError::validation(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LEN
            )));
        }
        let role = match request.role.as_deref() {
            Some(role) => parse_role(role)?,
            None => Role::default(),
        };

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password_blocking(password, self.bcrypt_cost).await?;
        let user = self
            .store
            .insert_user(NewUser {
                email,
                password_hash,
                role: role.as_str().to_string(),
            })
            .await?;

        info!("Registered user {} with role {}", user.email, user.role);
        Ok(user.into())
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown emails and wrong passwords fail with the same error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<String> {
        let (email, password) = match (required(request.email), required(request.password)) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(ServiceError::validation("Email and password are required")),
        };

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            let _ = verify_password_blocking(password, self.dummy_hash.to_string()).await;
            warn!("Login failed for {}", email);
            return Err(ServiceError::invalid_credentials());
        };

        let verified = match verify_password_blocking(password, user.password).await {
            Ok(verified) => verified,
            Err(e) => {
                tracing::error!("Stored password hash for {} is unusable: {}", email, e);
                false
            }
        };
        if !verified {
            warn!("Login failed for {}", email);
            return Err(ServiceError::invalid_credentials());
        }

        Ok(self.keys.issue(&email)?)
    }

    /// Verify a bearer token and return the identity it was issued for
    pub fn resolve_identity(&self, token: &str) -> ServiceResult<AuthUser> {
        if token.is_empty() {
            return Err(ServiceError::Authentication("Missing access token".to_string()));
        }
        Ok(self.keys.verify(token)?.into())
    }

    /// Stored role of the caller
    pub async fn get_role(&self, caller: &AuthUser) -> ServiceResult<String> {
        self.store
            .find_user_by_email(&caller.email)
            .await?
            .map(|user| user.role)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Caller's role for authorization checks. A missing user or an
    /// unrecognised stored role grants nothing.
    pub async fn caller_role(&self, caller: &AuthUser) -> ServiceResult<Option<Role>> {
        let user = self.store.find_user_by_email(&caller.email).await?;
        Ok(user.and_then(|u| u.role.parse::<Role>().ok()))
    }

    /// `Authorization` unless the caller's stored role is admin
    pub async fn require_admin(&self, caller: &AuthUser) -> ServiceResult<()> {
        match self.caller_role(caller).await? {
            Some(role) if role.is_admin() => Ok(()),
            _ => {
                warn!("Denied admin operation to {}", caller.email);
                Err(ServiceError::permission_denied())
            }
        }
    }

    /// Change another user's role. Admin only; re-applying a role is a no-op success.
    pub async fn update_role(&self, caller: &AuthUser, request: UpdateRoleRequest) -> ServiceResult<(String, Role)> {
        self.require_admin(caller).await?;

        let (email, role) = match (required(request.email), required(request.role)) {
            (Some(email), Some(role)) => (email, role),
            _ => return Err(ServiceError::validation("Email and role are required")),
        };
        let role = parse_role(&role)?;

        self.assign_role(&email, role).await?;
        info!("{} set role of {} to {}", caller.email, email, role);
        Ok((email, role))
    }

    /// Set a role without an authorization check (operator bootstrap)
    pub async fn assign_role(&self, email: &str, role: Role) -> ServiceResult<()> {
        let matched = self.store.update_user_role(email, role.as_str()).await?;
        if matched == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Remove a user by email. Admin only; deleting an unknown email succeeds.
    pub async fn delete_user(&self, caller: &AuthUser, target_email: &str) -> ServiceResult<()> {
        self.require_admin(caller).await?;

        let removed = self.store.delete_user(target_email).await?;
        info!("{} deleted user {} ({} row(s))", caller.email, target_email, removed);
        Ok(())
    }

    /// All registered emails plus the caller's own identity
    pub async fn list_users(&self, caller: &AuthUser) -> ServiceResult<UserDirectory> {
        let users = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|user| user.email)
            .collect();

        Ok(UserDirectory {
            users,
            current_user: caller.email.clone(),
        })
    }

    /// Users with their roles, without password hashes
    pub async fn user_summaries(&self) -> ServiceResult<Vec<UserSummary>> {
        Ok(self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(UserSummary::from)
            .collect())
    }
}
