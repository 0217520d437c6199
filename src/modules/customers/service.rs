use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::{Customer, NewCustomer};
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_customer_by_email(&self, email: &str) -> Result<Customer, StoreError>;

    async fn create_customer(&self, customer: NewCustomer) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgCustomerRepository {
    db: PgPool,
}

impl PgCustomerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn get_customer_by_email(&self, email: &str) -> Result<Customer, StoreError> {
        with_timeout(
            timeouts::ACCOUNTS,
            sqlx::query_as::<_, Customer>(
                r#"
                SELECT customer_id::bigint AS id, store_id::bigint AS store_id,
                       first_name, last_name, email, user_id
                FROM customer
                WHERE email = $1
                ORDER BY customer_id
                LIMIT 1
                "#,
            )
            .bind(email)
            .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self), fields(customer.email = %customer.email))]
    async fn create_customer(&self, customer: NewCustomer) -> Result<(), StoreError> {
        with_timeout(
            timeouts::ACCOUNTS,
            sqlx::query(
                r#"
                INSERT INTO customer (store_id, first_name, last_name, email)
                VALUES ($1::smallint, $2, $3, $4)
                "#,
            )
            .bind(customer.store_id)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .execute(&self.db),
        )
        .await?;

        Ok(())
    }
}
