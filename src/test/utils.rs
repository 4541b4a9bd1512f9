// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::{open_account_store, PanelSettings, StoreConnectionConfig};
use crate::providers::AccountProvider;
use crate::stores::SeaOrmAccountStore;

pub const TEST_APP_ID: &str = "test-app";

/// Fresh in-memory account store with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    open_account_store(&StoreConnectionConfig::in_memory())
        .await
        .expect("Failed to open test account store")
}

/// Account store namespaced to `TEST_APP_ID`, empty
pub async fn setup_test_store() -> SeaOrmAccountStore {
    let (_db, store) = setup_test_store_in(TEST_APP_ID).await;
    store
}

/// Returns (db, store) so callers can open a second namespace on the same db
pub async fn setup_test_store_in(app_id: &str) -> (DatabaseConnection, SeaOrmAccountStore) {
    let db = setup_test_db().await;
    let settings = PanelSettings::new(app_id, None);
    let store = SeaOrmAccountStore::new(db.clone(), settings.collection_path());
    (db, store)
}

/// AppData over a fresh store with the `admin` owner already seeded
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let app_data = Arc::new(AppData::init(db, PanelSettings::new(TEST_APP_ID, None)));

    AccountProvider::new(app_data.account_store.clone())
        .seed_owner()
        .await
        .expect("Failed to seed owner account");

    app_data
}
