use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::{AppConfig, StorageBackend};
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if config.database.backend == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND is memory; migrations only affect this process");
    }

    config.database.run_migrations = true;
    DatabaseManager::open(&config.database).await?;

    output_success(
        &output_format,
        "Schema is up to date",
        Some(json!({ "backend": config.database.backend })),
    )
}
