use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InternalError;

/// Application role stored on each account record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Reseller,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Reseller => "reseller",
            Role::User => "user",
        }
    }

    /// Privilege rank; a higher rank satisfies every lower requirement
    pub fn rank(&self) -> u8 {
        match self {
            Role::Owner => 2,
            Role::Reseller => 1,
            Role::User => 0,
        }
    }

    pub fn satisfies(&self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owner" => Ok(Role::Owner),
            "reseller" => Ok(Role::Reseller),
            "user" => Ok(Role::User),
            other => Err(InternalError::parse("role", format!("unknown role '{}'", other))),
        }
    }
}
