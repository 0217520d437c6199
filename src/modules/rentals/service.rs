use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::Rental;
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn get_rental_by_id(&self, id: i64) -> Result<Rental, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgRentalRepository {
    db: PgPool,
}

impl PgRentalRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RentalRepository for PgRentalRepository {
    #[instrument(skip(self))]
    async fn get_rental_by_id(&self, id: i64) -> Result<Rental, StoreError> {
        // rental dates are stored without zone and are UTC.
        with_timeout(
            timeouts::CATALOG,
            sqlx::query_as::<_, Rental>(
                r#"
                SELECT rental_id::bigint AS id,
                       rental_date AT TIME ZONE 'UTC' AS rental_date,
                       return_date AT TIME ZONE 'UTC' AS return_date,
                       inventory_id::bigint AS inventory_id
                FROM rental
                WHERE rental_id = $1
                "#,
            )
            .bind(id)
            .fetch_one(&self.db),
        )
        .await
    }
}
