//! Roles.
//!
//! Exactly two roles exist. The database stores the name as text; it is
//! converted to [`RoleName`] at the boundary and any other value is refused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Staff-backed accounts.
    Admin,
    Customer,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Customer => "customer",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role name: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleName::Admin),
            "customer" => Ok(RoleName::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: i64,
    pub name: RoleName,
    /// Descriptive only; access checks compare names.
    pub level: i32,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        self.name == RoleName::Admin
    }
}

/// A `roles` row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub level: i32,
}

impl TryFrom<RoleRow> for Role {
    type Error = UnknownRole;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: row.id,
            name: row.name.parse()?,
            level: row.level,
        })
    }
}
