use std::fmt;

use serde::Serialize;

use crate::errors::InternalError;
use crate::types::db;

use super::role::Role;

/// Account record as held by the account store
///
/// The password is kept exactly as stored (plaintext) and is never written
/// out by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .finish()
    }
}

impl TryFrom<db::account::Model> for Account {
    type Error = InternalError;

    fn try_from(model: db::account::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: model.role.parse()?,
            username: model.username,
            password: model.password,
        })
    }
}

/// Listing entry; carries no credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub username: String,
    pub role: Role,
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username: {} - Role: {}", self.username, self.role)
    }
}
