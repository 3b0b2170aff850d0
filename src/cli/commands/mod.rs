pub mod migrate;
pub mod serve;
pub mod user;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, Store};

/// Load the environment configuration and open its storage backend
pub(crate) async fn open_store() -> anyhow::Result<(AppConfig, Arc<dyn Store>)> {
    let config = AppConfig::from_env()?;
    let store = DatabaseManager::open(&config.database).await?;
    Ok((config, store))
}
