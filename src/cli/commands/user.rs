use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{service, DatabaseManager};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an author account")]
    Add {
        #[arg(long, help = "Unique email address")]
        email: String,
        #[arg(long, help = "Display name shown on posts")]
        name: Option<String>,
        #[arg(long, help = "Account password")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { email, name, password } => {
            let db = DatabaseManager::connect(&config.database).await?;
            let result = service::create_user(db.pool(), &email, name.as_deref(), &password).await;
            db.close().await;
            let user = result?;

            output_success(
                output_format,
                &format!("Created user {} ({})", user.email, user.id),
                Some(json!({ "id": user.id, "email": user.email, "name": user.name })),
            )
        }
    }
}
