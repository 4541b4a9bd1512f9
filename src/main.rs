use clap::Parser;

use tierdesk::cli::{execute_command, Cli};
use tierdesk::config::{init_logging, LoggingConfig, PanelSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config)?;

    let settings = PanelSettings::from_env()?;
    tracing::debug!(app_id = %settings.app_id(), "Loaded panel settings");

    execute_command(cli, settings).await
}
