// handlers/protected/users.rs - Role lookup and user administration

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{UpdateRoleRequest, UserDirectory};
use crate::state::AppState;

/// GET /get_role - Role of the token's subject
///
/// 404 when the user was removed after the token was issued.
pub async fn get_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Value> {
    let role = state.identity.get_role(&caller).await?;

    Ok(ApiResponse::success(json!({ "role": role })))
}

/// GET /get_users - Every registered email plus the caller's own
pub async fn get_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<UserDirectory> {
    let directory = state.identity.list_users(&caller).await?;

    Ok(ApiResponse::success(directory))
}

/// PUT /update_role - Admin only
///
/// Expected Input:
/// ```json
/// { "email": "target@example.com", "role": "moderator" }
/// ```
///
/// Non-admins get 403 whatever the body holds, malformed JSON included.
pub async fn update_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            state.identity.require_admin(&caller).await?;
            return Err(ApiError::invalid_json(rejection.body_text()));
        }
    };

    let (email, role) = state.identity.update_role(&caller, payload).await?;

    Ok(ApiResponse::success(json!({
        "msg": format!("Role for {} updated to {}", email, role)
    })))
}

/// DELETE /delete_user/:email - Admin only; unknown emails succeed
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(email): Path<String>,
) -> ApiResult<Value> {
    state.identity.delete_user(&caller, &email).await?;

    Ok(ApiResponse::success(json!({
        "msg": format!("User {} deleted successfully", email)
    })))
}
