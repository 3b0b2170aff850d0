use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{CommentService, IdentityService};

/// Everything a request handler needs, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub identity: IdentityService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        let keys = TokenKeys::from_config(&config.security);
        let identity = IdentityService::new(store.clone(), keys, config.security.bcrypt_cost);
        let comments = CommentService::new(store.clone(), identity.clone());

        Self {
            config: Arc::new(config),
            store,
            identity,
            comments,
        }
    }
}
