//! Repository aggregate and the shared store error.
//!
//! Each business module owns a repository trait and its PostgreSQL
//! implementation (`modules::<name>::service`). [`Store`] bundles them behind
//! trait objects so handlers, middleware and tests all see the same seams.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dvdrental_db::PgPool;
use dvdrental_models::UnknownRole;

use crate::modules::customers::service::{CustomerRepository, PgCustomerRepository};
use crate::modules::movies::service::{MovieRepository, PgMovieRepository};
use crate::modules::rentals::service::{PgRentalRepository, RentalRepository};
use crate::modules::roles::service::{PgRoleRepository, RoleRepository};
use crate::modules::staff::service::{PgStaffRepository, StaffRepository};
use crate::modules::users::service::{PgUserRepository, UserRepository};

/// Per-call deadlines.
pub mod timeouts {
    use std::time::Duration;

    pub const ROLES: Duration = Duration::from_secs(1);
    pub const ACCOUNTS: Duration = Duration::from_secs(3);
    pub const CATALOG: Duration = Duration::from_secs(5);
    pub const REGISTRATION: Duration = Duration::from_secs(10);
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no rows in result set")]
    NotFound,

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("email already exists")]
    EmailTaken,

    #[error("username already exists")]
    UsernameTaken,

    #[error("account already registered")]
    AlreadyLinked,

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Runs a query under a deadline. Dropping the future on timeout cancels the query.
pub async fn with_timeout<T, E, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// All repositories the API uses.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub movies: Arc<dyn MovieRepository>,
    pub rentals: Arc<dyn RentalRepository>,
}

impl Store {
    pub fn postgres(db: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            roles: Arc::new(PgRoleRepository::new(db.clone())),
            staff: Arc::new(PgStaffRepository::new(db.clone())),
            customers: Arc::new(PgCustomerRepository::new(db.clone())),
            movies: Arc::new(PgMovieRepository::new(db.clone())),
            rentals: Arc::new(PgRentalRepository::new(db)),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
