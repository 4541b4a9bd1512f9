use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::{ForbiddenReason, PanelError, RequiredField};
use crate::providers::account_provider::{AddOutcome, DeleteOutcome};
use crate::providers::AccountProvider;
use crate::types::internal::{AccountSummary, FormAction, FormSubmission};

/// Account management workflows behind both management menus
pub struct AccountCoordinator {
    account_provider: Arc<AccountProvider>,
}

impl AccountCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            account_provider: Arc::new(AccountProvider::new(app_data.account_store.clone())),
        }
    }

    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, PanelError> {
        Ok(self.account_provider.list_accounts().await?)
    }

    /// Run a form submission and return the success message to show
    pub async fn submit(&self, submission: &FormSubmission) -> Result<String, PanelError> {
        match submission.action {
            FormAction::Add => self.add(submission).await,
            FormAction::Delete => self.delete(submission).await,
        }
    }

    async fn add(&self, submission: &FormSubmission) -> Result<String, PanelError> {
        let outcome = self
            .account_provider
            .add_account(
                &submission.username,
                &submission.password,
                submission.target_role,
            )
            .await?;

        match outcome {
            AddOutcome::Created { account } => {
                tracing::info!(username = %account.username, role = %account.role, "Account added");
                Ok(format!(
                    "Account {} ({}) added successfully!",
                    account.username, account.role
                ))
            }
            AddOutcome::MissingUsername => Err(PanelError::MissingField(RequiredField::Username)),
            AddOutcome::AlreadyExists { username } => Err(PanelError::AlreadyExists { username }),
        }
    }

    async fn delete(&self, submission: &FormSubmission) -> Result<String, PanelError> {
        let outcome = self
            .account_provider
            .delete_account(&submission.username, submission.target_role)
            .await?;

        match outcome {
            DeleteOutcome::Deleted { account } => {
                tracing::info!(username = %account.username, role = %account.role, "Account deleted");
                Ok(format!("Account {} deleted successfully!", account.username))
            }
            DeleteOutcome::MissingUsername => Err(PanelError::MissingField(RequiredField::Username)),
            DeleteOutcome::NotFound { username } => Err(PanelError::NotFound { username }),
            DeleteOutcome::OwnerProtected { username } => {
                tracing::warn!(username = %username, "Refused to delete owner account");
                Err(PanelError::Forbidden(ForbiddenReason::OwnerProtected))
            }
            DeleteOutcome::RoleMismatch { username, actual } => {
                tracing::warn!(username = %username, actual = %actual, expected = %submission.target_role, "Refused cross-role delete");
                Err(PanelError::Forbidden(ForbiddenReason::RoleMismatch {
                    actual,
                    expected: submission.target_role,
                }))
            }
        }
    }
}
