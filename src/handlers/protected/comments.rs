// handlers/protected/comments.rs - Reading and moderating comments

use axum::extract::{rejection::PathRejection, Path, State};
use axum::Extension;
use serde_json::{json, Value};

use crate::database::models::Comment;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// Comment ids arrive as path segments; anything but an integer is a 400
fn comment_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::bad_request(format!("Invalid comment id: {}", rejection.body_text())))
}

/// GET /get_comments - All comments, most recent first
pub async fn get_comments(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Value> {
    let comments = state.comments.list_comments(&caller).await?;

    Ok(ApiResponse::success(json!({ "comments": comments })))
}

/// GET /get_comment/:id - `{id, comment, email, timestamp}` or 404
pub async fn get_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Comment> {
    let id = comment_id(path)?;
    let comment = state.comments.get_comment(&caller, id).await?;

    Ok(ApiResponse::success(comment))
}

/// DELETE /delete_comment/:id - Admins and moderators only
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let id = comment_id(path)?;
    state.comments.delete_comment(&caller, id).await?;

    Ok(ApiResponse::success(json!({ "msg": "Comment deleted successfully" })))
}
