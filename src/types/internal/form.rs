use std::fmt;
use std::str::FromStr;

use super::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormAction {
    Add,
    Delete,
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormAction::Add => f.write_str("add"),
            FormAction::Delete => f.write_str("delete"),
        }
    }
}

impl FromStr for FormAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "add" => Ok(FormAction::Add),
            "delete" => Ok(FormAction::Delete),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// A submitted management form, scoped to one target role
#[derive(Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: FormAction,
    pub target_role: Role,
    pub username: String,
    /// Only read by `FormAction::Add`
    pub password: String,
}

impl fmt::Debug for FormSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSubmission")
            .field("action", &self.action)
            .field("target_role", &self.target_role)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
