use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Comment Board API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": ["/register", "/login", "/post_comment", "/health"],
            "protected": [
                "/get_role",
                "/get_users",
                "/update_role",
                "/delete_user/:email",
                "/get_comments",
                "/get_comment/:id",
                "/delete_comment/:id"
            ]
        }
    }))
}

/// GET /health - Liveness plus storage connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
