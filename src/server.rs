use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/register", post(public::register))
        .route("/login", post(public::login))
        .route("/post_comment", post(public::post_comment))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/get_role", get(protected::get_role))
        .route("/get_users", get(protected::get_users))
        .route("/update_role", put(protected::update_role))
        .route("/delete_user/:email", delete(protected::delete_user))
        .route("/get_comments", get(protected::get_comments))
        .route("/get_comment/:id", get(protected::get_comment))
        .route("/delete_comment/:id", delete(protected::delete_comment))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Permissive when no origins are configured, otherwise restricted to the list
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Open storage, bind the configured address and serve until the process stops
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = DatabaseManager::open(&config.database).await?;
    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Comment board API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::new(AppConfig::for_tests(), Arc::new(MemoryStore::new())))
    }

    fn token_for(state: &AppState, email: &str) -> String {
        crate::auth::TokenKeys::from_config(&state.config.security)
            .issue(email)
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        for (method, uri) in [
            ("GET", "/get_role"),
            ("GET", "/get_users"),
            ("GET", "/get_comments"),
            ("GET", "/get_comment/1"),
            ("DELETE", "/delete_comment/1"),
            ("DELETE", "/delete_user/a@x.com"),
        ] {
            let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
            let response = test_app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let request = Request::builder()
            .uri("/get_comments")
            .header("authorization", "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn register_returns_created_message() {
        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(Body::from(json!({"email": "a@x.com", "password": "pw"}).to_string()))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({"msg": "User registered successfully"}));
    }

    #[tokio::test]
    async fn non_numeric_comment_id_is_bad_request() {
        let state = AppState::new(AppConfig::for_tests(), Arc::new(MemoryStore::new()));
        let token = token_for(&state, "a@x.com");
        let request = Request::builder()
            .uri("/get_comment/abc")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
