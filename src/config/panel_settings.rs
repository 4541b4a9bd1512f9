use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::store_config::StoreConnectionConfig;
use crate::config::EnvironmentProvider;
use crate::types::internal::SessionToken;

pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Settings supplied to a panel session at startup
///
/// Loading never fails because the store configuration is missing; that is
/// reported by startup so the user sees it in the session.
#[derive(Clone)]
pub struct PanelSettings {
    app_id: String,
    store_config: Option<String>,
    initial_auth_token: Option<SessionToken>,
    session_token_secret: Option<String>,
}

impl PanelSettings {
    /// Load panel settings from an environment provider
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let app_id_spec = ConfigSpec::new(env_provider.clone())
            .env_override("APP_ID")
            .default_value(DEFAULT_APP_ID)
            .min_length(1)
            .validator(Self::validate_app_id);

        let store_config_spec = ConfigSpec::new(env_provider.clone()).env_override("STORE_CONFIG");

        let token_spec = ConfigSpec::new(env_provider.clone()).env_override("INITIAL_AUTH_TOKEN");

        let secret_spec = ConfigSpec::new(env_provider.clone())
            .env_override("SESSION_TOKEN_SECRET")
            .min_length(16);

        Ok(Self {
            app_id: app_id_spec.load_setting_with_source()?.value,
            store_config: store_config_spec.load_optional()?,
            initial_auth_token: token_spec.load_optional()?.map(SessionToken::from),
            session_token_secret: secret_spec.load_optional()?,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Settings built in code, e.g. for tests or embedding
    pub fn new(app_id: impl Into<String>, store_config: Option<String>) -> Self {
        Self {
            app_id: app_id.into(),
            store_config,
            initial_auth_token: None,
            session_token_secret: None,
        }
    }

    pub fn with_session_token(mut self, token: impl AsRef<str>, secret: impl Into<String>) -> Self {
        self.initial_auth_token = Some(SessionToken::from(token.as_ref()));
        self.session_token_secret = Some(secret.into());
        self
    }

    fn validate_app_id(value: &str) -> Result<(), String> {
        if value.contains('/') {
            return Err("application identifier must not contain '/'".to_string());
        }
        Ok(())
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Collection holding this application's account records
    pub fn collection_path(&self) -> String {
        format!("artifacts/{}/public/data/accounts", self.app_id)
    }

    /// Parsed store-connection configuration
    pub fn store_config(&self) -> Result<StoreConnectionConfig, ApplicationError> {
        StoreConnectionConfig::from_blob(self.store_config.as_deref())
    }

    pub fn initial_auth_token(&self) -> Option<&SessionToken> {
        self.initial_auth_token.as_ref()
    }

    pub fn session_token_secret(&self) -> Option<&str> {
        self.session_token_secret.as_deref()
    }
}

impl fmt::Debug for PanelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSettings")
            .field("app_id", &self.app_id)
            .field("store_configured", &self.store_config.is_some())
            .field("initial_auth_token", &self.initial_auth_token)
            .field("session_token_secret", &self.session_token_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
