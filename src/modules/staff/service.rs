use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::Staff;
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn get_staff_by_email(&self, email: &str) -> Result<Staff, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgStaffRepository {
    db: PgPool,
}

impl PgStaffRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    #[instrument(skip(self))]
    async fn get_staff_by_email(&self, email: &str) -> Result<Staff, StoreError> {
        with_timeout(
            timeouts::ACCOUNTS,
            sqlx::query_as::<_, Staff>(
                "SELECT staff_id::bigint AS id, email, user_id FROM staff WHERE email = $1",
            )
            .bind(email)
            .fetch_one(&self.db),
        )
        .await
    }
}
