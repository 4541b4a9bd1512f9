use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::{PanelError, RequiredField};
use crate::providers::credential_provider::LoginOutcome;
use crate::providers::CredentialProvider;
use crate::types::internal::Account;

pub struct LoginCoordinator {
    credential_provider: Arc<CredentialProvider>,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_provider: Arc::new(CredentialProvider::new(app_data.account_store.clone())),
        }
    }

    /// Boundary check on the raw input, runs before the session is asked
    /// whether it is ready
    pub fn validate_input(username: &str, password: &str) -> Result<(), PanelError> {
        if username.is_empty() || password.is_empty() {
            return Err(PanelError::MissingField(RequiredField::Credentials));
        }
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Account, PanelError> {
        Self::validate_input(username, password)?;

        match self
            .credential_provider
            .verify_credentials(username, password)
            .await?
        {
            LoginOutcome::Success { account } => {
                tracing::info!(username = %account.username, role = %account.role, "Login succeeded");
                Ok(account)
            }
            LoginOutcome::InvalidCredentials => {
                tracing::info!(username = %username.trim(), "Login rejected");
                Err(PanelError::InvalidCredentials)
            }
        }
    }
}
