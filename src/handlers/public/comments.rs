use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::PostCommentRequest;
use crate::state::AppState;

/// POST /post_comment - Anonymous comment submission
///
/// Body `{"comments": "...", "email": "..."}`. The email is not checked
/// against registered users.
pub async fn post_comment(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PostCommentRequest>,
) -> ApiResult<Value> {
    let stored = state.comments.post_comment(payload).await?;

    Ok(ApiResponse::created(json!({
        "message": "Comment posted successfully",
        "comment": stored.comment,
        "email": stored.email,
    })))
}
