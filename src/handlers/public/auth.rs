// handlers/public/auth.rs - POST /register and POST /login

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::{LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /register - Create a user account
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",     // Required
///   "password": "string",  // Required
///   "role": "string"       // Optional: user | moderator | admin (default user)
/// }
/// ```
///
/// Responds 201 `{"msg": "User registered successfully"}`; nothing about the
/// stored user is echoed back.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> ApiResult<Value> {
    state.identity.register(payload).await?;

    Ok(ApiResponse::created(json!({ "msg": "User registered successfully" })))
}

/// POST /login - Exchange credentials for an access token
///
/// Expected Input:
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// Expected Output:
/// ```json
/// { "access_token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// An unknown email and a wrong password both produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<Value> {
    let access_token = state.identity.login(payload).await?;

    Ok(ApiResponse::success(json!({ "access_token": access_token })))
}
