mod config_spec;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod panel_settings;
mod store_config;

pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use database::{connect_account_store, migrate_account_store, open_account_store};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ApplicationError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use panel_settings::{PanelSettings, DEFAULT_APP_ID};
pub use store_config::StoreConnectionConfig;
