use std::sync::Arc;

use crate::errors::InternalError;
use crate::stores::AccountStore;
use crate::types::internal::Account;

pub enum LoginOutcome {
    Success { account: Account },
    InvalidCredentials,
}

/// Checks submitted credentials against the account store
pub struct CredentialProvider {
    store: Arc<dyn AccountStore>,
}

impl CredentialProvider {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Username is trimmed; the password is compared exactly as typed
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        let account = self
            .store
            .find_by_credentials(username.trim(), password)
            .await?;

        Ok(match account {
            Some(account) => LoginOutcome::Success { account },
            None => LoginOutcome::InvalidCredentials,
        })
    }
}
