use thiserror::Error;

pub mod account;
pub mod database;
pub mod identity;

pub use account::AccountError;
pub use database::DatabaseError;
pub use identity::IdentityError;

use crate::config::ApplicationError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, configuration) are shared by every
/// layer; domain errors (account, identity) belong to one collaborator.
/// Not shown to users directly - coordinators convert to `PanelError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Configuration(#[from] ApplicationError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }
}
