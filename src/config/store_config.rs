use std::time::Duration;

use sea_orm::ConnectOptions;
use serde::Deserialize;

use crate::config::errors::ApplicationError;

/// Store-connection configuration, supplied as a JSON blob
///
/// ```json
/// {"database_url": "sqlite://tierdesk.db?mode=rwc", "max_connections": 5}
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreConnectionConfig {
    pub database_url: String,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub min_connections: Option<u32>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl StoreConnectionConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: None,
            min_connections: None,
            connect_timeout_secs: None,
            sqlx_logging: false,
        }
    }

    /// Parse the blob; an absent, blank or empty-object blob means "not configured"
    pub fn from_blob(blob: Option<&str>) -> Result<Self, ApplicationError> {
        let blob = match blob.map(str::trim) {
            Some(b) if !b.is_empty() => b,
            _ => return Err(ApplicationError::MissingStoreConfiguration),
        };

        let value: serde_json::Value = serde_json::from_str(blob).map_err(|e| {
            ApplicationError::ParseError {
                setting_name: "STORE_CONFIG".to_string(),
                error: e.to_string(),
            }
        })?;

        if value.as_object().is_some_and(|o| o.is_empty()) {
            return Err(ApplicationError::MissingStoreConfiguration);
        }

        let config: StoreConnectionConfig =
            serde_json::from_value(value).map_err(|e| ApplicationError::ParseError {
                setting_name: "STORE_CONFIG".to_string(),
                error: e.to_string(),
            })?;

        if config.database_url.trim().is_empty() {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "STORE_CONFIG.database_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(config)
    }

    /// In-memory SQLite; one pooled connection so every query sees the same database
    pub fn in_memory() -> Self {
        Self {
            max_connections: Some(1),
            min_connections: Some(1),
            ..Self::new("sqlite::memory:")
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.clone());
        if let Some(max) = self.max_connections {
            options.max_connections(max);
        }
        if let Some(min) = self.min_connections {
            options.min_connections(min);
        }
        if let Some(secs) = self.connect_timeout_secs {
            options.connect_timeout(Duration::from_secs(secs));
        }
        options.sqlx_logging(self.sqlx_logging);
        options
    }
}
