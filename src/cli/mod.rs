pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "board")]
#[command(about = "Board CLI - Operator commands for the comment board API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API with the environment configuration")]
    Serve,

    #[command(about = "Create the user and comment tables if they do not exist")]
    Migrate,

    #[command(about = "Set a user's role directly in storage (bootstrap the first admin)")]
    SetRole {
        #[arg(help = "Email of the user to update")]
        email: String,
        #[arg(help = "New role: user, moderator or admin")]
        role: String,
    },

    #[command(about = "List registered users with their roles")]
    Users,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::SetRole { email, role } => {
            commands::user::set_role(&email, &role, output_format).await
        }
        Commands::Users => commands::user::list(output_format).await,
    }
}
