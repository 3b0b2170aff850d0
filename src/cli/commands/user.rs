use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::state::AppState;
use crate::types::Role;

use super::open_store;

/// `board set-role <email> <role>`
pub async fn set_role(email: &str, role: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let (config, store) = open_store().await?;
    let state = AppState::new(config, store);

    state.identity.assign_role(email, role).await?;

    output_success(
        &output_format,
        &format!("Role for {} updated to {}", email, role),
        Some(json!({ "email": email, "role": role })),
    )
}

/// `board users`
pub async fn list(output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, store) = open_store().await?;
    let state = AppState::new(config, store);

    let users = state.identity.user_summaries().await?;
    if users.is_empty() {
        return output_empty_collection(&output_format, "users", "No users registered");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text => {
            println!("{:<6} {:<40} {}", "ID", "EMAIL", "ROLE");
            for user in users {
                println!("{:<6} {:<40} {}", user.id, user.email, user.role);
            }
        }
    }
    Ok(())
}
