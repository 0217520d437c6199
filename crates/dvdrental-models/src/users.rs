//! The unified user identity shared by staff and customers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::roles::Role;

/// An authenticated identity with its role resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Never serialized, so cached copies do not carry the hash.
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
}

/// A `users` row as stored, before its role is resolved.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role_id: i64,
}

impl UserRecord {
    pub fn with_role(self, role: Role) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            role,
        }
    }
}

/// Insert payload for a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role_id: i64,
}

/// The pre-provisioned row that a new user is linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountLink {
    Staff(i64),
    Customer(i64),
}
