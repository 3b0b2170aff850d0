use crate::config::AppConfig;

pub async fn handle() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    crate::server::serve(config).await
}
