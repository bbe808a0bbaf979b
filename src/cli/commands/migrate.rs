use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config.database).await?;
    let result = db.migrate().await;
    db.close().await;
    result?;

    output_success(output_format, "Migrations applied", None)
}
