// CLI module - binary entry points for a panel session

pub mod console;
pub mod seed;

use clap::{Parser, Subcommand};

use crate::config::PanelSettings;

/// Tierdesk account management panel
#[derive(Parser)]
#[command(name = "tierdesk")]
#[command(about = "Role-tiered account management panel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run an interactive panel session (default)
    Console,

    /// Open the account store, seed the owner account and exit
    Seed,
}

/// Route the parsed CLI command to its handler
pub async fn execute_command(
    cli: Cli,
    settings: PanelSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => console::run_console(settings).await?,
        Commands::Seed => seed::run_seed(settings).await?,
    }

    Ok(())
}
