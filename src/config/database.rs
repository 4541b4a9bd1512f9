use migration::{AccountMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::StoreConnectionConfig;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connect to the account store described by `config`
///
/// Does NOT run migrations - call `migrate_account_store()` separately.
pub async fn connect_account_store(
    config: &StoreConnectionConfig,
) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(config.connect_options())
        .await
        .map_err(|source| DatabaseError::Connect { source })?;

    tracing::debug!("Connected to account store: {}", config.database_url);

    Ok(db)
}

/// Run all pending migrations on the account store
pub async fn migrate_account_store(db: &DatabaseConnection) -> Result<(), InternalError> {
    AccountMigrator::up(db, None)
        .await
        .map_err(|source| DatabaseError::Migration { source })?;

    tracing::debug!("Account store migrations completed");

    Ok(())
}

/// Connect and migrate in one step
pub async fn open_account_store(
    config: &StoreConnectionConfig,
) -> Result<DatabaseConnection, InternalError> {
    let db = connect_account_store(config).await?;
    migrate_account_store(&db).await?;
    Ok(db)
}
