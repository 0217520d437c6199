use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::{AccountLink, NewUser, UserRecord};
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and links the staff or customer row to it, atomically.
    /// Fails with [`StoreError::AlreadyLinked`] if the row was linked meanwhile.
    async fn register_user(&self, user: NewUser, link: AccountLink) -> Result<i64, StoreError>;

    async fn get_user_by_id(&self, id: i64) -> Result<UserRecord, StoreError>;

    /// The user's current role id, without the rest of the row.
    async fn get_user_role_id(&self, id: i64) -> Result<i64, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(user.email = %user.email, link = ?link))]
    async fn register_user(&self, user: NewUser, link: AccountLink) -> Result<i64, StoreError> {
        with_timeout(timeouts::REGISTRATION, async {
            let mut tx = self.db.begin().await?;

            let user_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO users (email, username, password, role_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

            let linked = match link {
                AccountLink::Staff(staff_id) => {
                    sqlx::query("UPDATE staff SET user_id = $1 WHERE staff_id = $2 AND user_id IS NULL")
                        .bind(user_id)
                        .bind(staff_id)
                        .execute(&mut *tx)
                        .await?
                }
                AccountLink::Customer(customer_id) => {
                    sqlx::query(
                        "UPDATE customer SET user_id = $1 WHERE customer_id = $2 AND user_id IS NULL",
                    )
                    .bind(user_id)
                    .bind(customer_id)
                    .execute(&mut *tx)
                    .await?
                }
            };

            // Dropping `tx` without commit rolls the insert back.
            if linked.rows_affected() != 1 {
                return Err(StoreError::AlreadyLinked);
            }

            tx.commit().await?;
            Ok::<_, StoreError>(user_id)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, id: i64) -> Result<UserRecord, StoreError> {
        with_timeout(
            timeouts::ACCOUNTS,
            sqlx::query_as::<_, UserRecord>(
                r#"
                SELECT id, email, username, password AS password_hash, role_id
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_user_role_id(&self, id: i64) -> Result<i64, StoreError> {
        with_timeout(
            timeouts::ACCOUNTS,
            sqlx::query_scalar::<_, i64>("SELECT role_id FROM users WHERE id = $1")
                .bind(id)
                .fetch_one(&self.db),
        )
        .await
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => StoreError::UsernameTaken,
                _ => StoreError::EmailTaken,
            };
        }
    }
    err.into()
}
