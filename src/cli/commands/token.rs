use anyhow::bail;
use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{service, DatabaseManager};

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Author id the token identifies")]
    pub user: Uuid,

    #[arg(long, help = "Hours until expiry (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,

    #[arg(long, help = "Skip checking that the user exists")]
    pub no_verify: bool,
}

pub async fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if !args.no_verify {
        let db = DatabaseManager::connect(&config.database).await?;
        let found = service::find_user(db.pool(), args.user).await;
        db.close().await;
        if found?.is_none() {
            bail!("user {} does not exist", args.user);
        }
    }

    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let token = generate_jwt(&Claims::new(args.user, Some(hours)), &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "token": token, "expires_in_hours": hours }))?
        ),
        OutputFormat::Text => println!("{token}"),
    }
    Ok(())
}
