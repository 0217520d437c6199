use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::{Role, RoleName, RoleRow};
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn get_role_by_name(&self, name: RoleName) -> Result<Role, StoreError>;

    async fn get_role_by_id(&self, id: i64) -> Result<Role, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    db: PgPool,
}

impl PgRoleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    #[instrument(skip(self))]
    async fn get_role_by_name(&self, name: RoleName) -> Result<Role, StoreError> {
        let row = with_timeout(
            timeouts::ROLES,
            sqlx::query_as::<_, RoleRow>("SELECT id, name, level FROM roles WHERE name = $1")
                .bind(name.as_str())
                .fetch_one(&self.db),
        )
        .await?;

        Ok(Role::try_from(row)?)
    }

    #[instrument(skip(self))]
    async fn get_role_by_id(&self, id: i64) -> Result<Role, StoreError> {
        let row = with_timeout(
            timeouts::ROLES,
            sqlx::query_as::<_, RoleRow>("SELECT id, name, level FROM roles WHERE id = $1")
                .bind(id)
                .fetch_one(&self.db),
        )
        .await?;

        Ok(Role::try_from(row)?)
    }
}
