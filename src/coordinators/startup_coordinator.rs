use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{open_account_store, PanelSettings};
use crate::errors::{InternalError, PanelError};
use crate::providers::{AccountProvider, IdentityProvider, TokenIdentityProvider};
use crate::types::internal::AuthContext;

/// Everything a session needs once startup has finished
pub struct StartupOutcome {
    pub app_data: Arc<AppData>,
    pub auth: AuthContext,
    /// Seeding failed after the session became ready
    pub seed_error: Option<PanelError>,
}

/// Startup workflow
///
/// 1. Check the store configuration is present
/// 2. Open and migrate the account store
/// 3. Sign in to the identity provider
/// 4. Seed the `admin` owner account
///
/// The session counts as ready once step 3 succeeds; a failed seed is
/// reported but does not undo that.
pub struct StartupCoordinator {
    settings: PanelSettings,
    identity_provider: Arc<dyn IdentityProvider>,
}

impl StartupCoordinator {
    pub fn new(settings: PanelSettings, identity_provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            settings,
            identity_provider,
        }
    }

    pub fn from_settings(settings: PanelSettings) -> Self {
        let identity_provider = Arc::new(TokenIdentityProvider::from_settings(&settings));
        Self::new(settings, identity_provider)
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub async fn initialize(&self) -> Result<StartupOutcome, PanelError> {
        let store_config = self
            .settings
            .store_config()
            .map_err(|e| PanelError::from(InternalError::from(e)))?;

        let db = open_account_store(&store_config).await.map_err(|e| {
            tracing::error!("Failed to open account store: {}", e);
            PanelError::from(e)
        })?;

        let auth = self
            .identity_provider
            .sign_in(self.settings.initial_auth_token())
            .await
            .map_err(|e| {
                tracing::error!("Identity sign-in failed: {}", e);
                PanelError::from(e)
            })?;

        let app_data = Arc::new(AppData::init(db, self.settings.clone()));

        let seed_error = match AccountProvider::new(app_data.account_store.clone())
            .seed_owner()
            .await
        {
            Ok(_) => None,
            Err(e) => {
                tracing::error!("Failed to seed owner account: {}", e);
                Some(PanelError::from(e))
            }
        };

        tracing::info!(app_id = %self.settings.app_id(), "Panel session ready");

        Ok(StartupOutcome {
            app_data,
            auth,
            seed_error,
        })
    }
}
