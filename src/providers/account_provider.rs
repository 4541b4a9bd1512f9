use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::stores::AccountStore;
use crate::types::internal::{Account, AccountSummary, Role};

pub const SEED_OWNER_USERNAME: &str = "admin";
pub const SEED_OWNER_PASSWORD: &str = "admin123";

pub enum AddOutcome {
    Created { account: Account },
    MissingUsername,
    AlreadyExists { username: String },
}

pub enum DeleteOutcome {
    Deleted { account: Account },
    MissingUsername,
    NotFound { username: String },
    OwnerProtected { username: String },
    RoleMismatch { username: String, actual: Role },
}

/// Account management rules shared by every role-scoped form
///
/// Nothing here knows which menu rendered the form; the only input that
/// varies is the role the form targets.
pub struct AccountProvider {
    store: Arc<dyn AccountStore>,
}

impl AccountProvider {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, InternalError> {
        let accounts = self.store.list_all().await?;
        Ok(accounts.iter().map(Account::summary).collect())
    }

    pub async fn add_account(
        &self,
        username: &str,
        password: &str,
        target_role: Role,
    ) -> Result<AddOutcome, InternalError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(AddOutcome::MissingUsername);
        }

        if self.store.exists_by_username(username).await? {
            return Ok(AddOutcome::AlreadyExists {
                username: username.to_owned(),
            });
        }

        match self.store.create(username, password, target_role).await {
            Ok(()) => Ok(AddOutcome::Created {
                account: Account::new(username, password, target_role),
            }),
            // Lost a race with another create between the check and the write
            Err(InternalError::Account(AccountError::AlreadyExists { username })) => {
                Ok(AddOutcome::AlreadyExists { username })
            }
            Err(e) => Err(e),
        }
    }

    /// Delete rules, checked in order: presence, owner protection, role scope
    pub async fn delete_account(
        &self,
        username: &str,
        target_role: Role,
    ) -> Result<DeleteOutcome, InternalError> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(DeleteOutcome::MissingUsername);
        }

        let Some(account) = self.store.find_by_username(username).await? else {
            return Ok(DeleteOutcome::NotFound {
                username: username.to_owned(),
            });
        };

        if account.role == Role::Owner {
            return Ok(DeleteOutcome::OwnerProtected {
                username: account.username,
            });
        }

        if account.role != target_role {
            return Ok(DeleteOutcome::RoleMismatch {
                username: account.username,
                actual: account.role,
            });
        }

        match self.store.delete_by_username(username).await {
            Ok(()) => Ok(DeleteOutcome::Deleted { account }),
            Err(InternalError::Account(AccountError::NotFound { username })) => {
                Ok(DeleteOutcome::NotFound { username })
            }
            Err(e) => Err(e),
        }
    }

    /// Ensure the `admin` owner account exists; returns whether it was written
    pub async fn seed_owner(&self) -> Result<bool, InternalError> {
        if self.store.find_by_username(SEED_OWNER_USERNAME).await?.is_some() {
            return Ok(false);
        }

        self.store
            .overwrite(&Account::new(SEED_OWNER_USERNAME, SEED_OWNER_PASSWORD, Role::Owner))
            .await?;

        tracing::info!("Seeded owner account '{}'", SEED_OWNER_USERNAME);

        Ok(true)
    }
}
