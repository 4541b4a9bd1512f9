// One-shot startup: open the store, sign in, seed the owner account

use crate::config::PanelSettings;
use crate::coordinators::StartupCoordinator;
use crate::providers::account_provider::SEED_OWNER_USERNAME;

pub async fn run_seed(settings: PanelSettings) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = StartupCoordinator::from_settings(settings);

    let outcome = match coordinator.initialize().await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("❌ {}", e.message());
            return Err(e.into());
        }
    };

    if let Some(e) = outcome.seed_error {
        println!("❌ Failed to seed the owner account: {}", e.message());
        return Err(e.into());
    }

    println!(
        "✅ Account store ready for '{}'; owner account '{}' is present.",
        coordinator.settings().app_id(),
        SEED_OWNER_USERNAME
    );

    Ok(())
}
