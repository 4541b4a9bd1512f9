use thiserror::Error;

use crate::config::ApplicationError;
use crate::errors::internal::{AccountError, InternalError};
use crate::types::internal::menu::Menu;
use crate::types::internal::role::Role;

/// Inputs that must be present before an action reaches the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// Login needs both username and password
    Credentials,
    Username,
    Role,
    Action,
    /// Form commands need an open management menu
    Menu,
    /// Dispatch needs both a destination and an option
    DispatchTarget,
}

/// Why a permitted-looking action was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForbiddenReason {
    OwnerProtected,
    RoleMismatch { actual: Role, expected: Role },
    MenuRestricted { menu: Menu },
    RoleNotAssignable { menu: Menu, role: Role },
    NotSignedIn,
}

/// User-facing error taxonomy
///
/// Every variant renders as inline text at the point of the user action;
/// none of them end the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("The application is not ready yet. Please try again.")]
    NotReady,

    #[error("Incorrect username or password.")]
    InvalidCredentials,

    #[error("Username already exists.")]
    AlreadyExists { username: String },

    #[error("Username not found.")]
    NotFound { username: String },

    #[error("{}", forbidden_message(.0))]
    Forbidden(ForbiddenReason),

    #[error("{}", missing_field_message(.0))]
    MissingField(RequiredField),

    #[error("Error: {message}")]
    RemoteFailure { operation: String, message: String },

    #[error("Error: account store configuration not found.")]
    MissingConfiguration,

    #[error("Error: invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Please wait for the current operation to finish.")]
    Busy,

    #[error("Operation cancelled.")]
    Cancelled,
}

impl PanelError {
    pub fn remote(operation: &str, message: impl Into<String>) -> Self {
        PanelError::RemoteFailure {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Text shown inline next to the control that triggered the action
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the failing operation got as far as querying the account store
    pub fn reached_store(&self) -> bool {
        matches!(self, PanelError::AlreadyExists { .. } | PanelError::NotFound { .. })
    }
}

fn forbidden_message(reason: &ForbiddenReason) -> String {
    match reason {
        ForbiddenReason::OwnerProtected => "Owner accounts cannot be deleted.".to_string(),
        ForbiddenReason::RoleMismatch { actual, expected } => format!(
            "Error: cannot delete an account with role {}. You can only delete {} accounts.",
            actual, expected
        ),
        ForbiddenReason::MenuRestricted { menu } => {
            format!("The {} requires the {} role.", menu, menu.minimum_role())
        }
        ForbiddenReason::RoleNotAssignable { menu, role } => {
            format!("The {} cannot manage {} accounts.", menu, role)
        }
        ForbiddenReason::NotSignedIn => "Please log in first.".to_string(),
    }
}

fn missing_field_message(field: &RequiredField) -> &'static str {
    match field {
        RequiredField::Credentials => "Username and password must not be empty.",
        RequiredField::Username => "Username must not be empty.",
        RequiredField::Role => "Choose a role first.",
        RequiredField::Action => "Choose an action first.",
        RequiredField::Menu => "Open a management menu first.",
        RequiredField::DispatchTarget => {
            "Failed to send: destination number and option must be filled in."
        }
    }
}

impl From<InternalError> for PanelError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Account(AccountError::AlreadyExists { username }) => {
                PanelError::AlreadyExists { username }
            }
            InternalError::Account(AccountError::NotFound { username }) => {
                PanelError::NotFound { username }
            }
            InternalError::Configuration(ApplicationError::MissingStoreConfiguration) => {
                PanelError::MissingConfiguration
            }
            InternalError::Configuration(other) => PanelError::InvalidConfiguration(other.to_string()),
            InternalError::Database(e) => PanelError::remote("store", e.to_string()),
            InternalError::Identity(e) => PanelError::remote("sign_in", e.to_string()),
            InternalError::Parse { value_type, message } => PanelError::remote(
                "store",
                format!("failed to parse {}: {}", value_type, message),
            ),
        }
    }
}
