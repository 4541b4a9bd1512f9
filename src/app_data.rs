use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::PanelSettings;
use crate::stores::{AccountStore, SeaOrmAccountStore};

/// Shared dependencies for one panel session
///
/// Built once by startup after the store is open, then handed to every
/// coordinator as `Arc<AppData>`.
///
/// ```text
/// StartupCoordinator::initialize()
///   ↓ opens + migrates the store
/// AppData::init(db, settings)
///   └─ account_store (Arc<dyn AccountStore>) scoped to settings.collection_path()
///   ↓ wrapped in Arc<AppData>
///   ├─ LoginCoordinator::new(app_data)
///   └─ AccountCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub settings: PanelSettings,
    pub account_store: Arc<dyn AccountStore>,
}

impl AppData {
    pub fn init(db: DatabaseConnection, settings: PanelSettings) -> Self {
        let namespace = settings.collection_path();
        tracing::debug!(namespace = %namespace, "Initializing AppData");

        let account_store: Arc<dyn AccountStore> = Arc::new(SeaOrmAccountStore::new(db, namespace));

        Self {
            settings,
            account_store,
        }
    }
}
