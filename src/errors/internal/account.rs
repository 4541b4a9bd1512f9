use thiserror::Error;

use super::InternalError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account already exists: {username}")]
    AlreadyExists { username: String },

    #[error("Account not found: {username}")]
    NotFound { username: String },
}

impl AccountError {
    pub fn already_exists(username: &str) -> InternalError {
        InternalError::Account(Self::AlreadyExists {
            username: username.to_owned(),
        })
    }

    pub fn not_found(username: &str) -> InternalError {
        InternalError::Account(Self::NotFound {
            username: username.to_owned(),
        })
    }
}
