use async_trait::async_trait;
use dvdrental_db::PgPool;
use dvdrental_models::{Movie, MovieQuery};
use tracing::instrument;

use crate::store::{StoreError, timeouts, with_timeout};

#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Films whose title or description contains `query.search`, ordered by
    /// release year, each with its current rentable copy count.
    async fn get_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgMovieRepository {
    db: PgPool,
}

impl PgMovieRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    #[instrument(skip(self))]
    async fn get_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError> {
        let sql = format!(
            r#"
            SELECT f.film_id::bigint AS id,
                   f.title,
                   f.description,
                   f.release_year::int4 AS release_year,
                   (SELECT COUNT(*) FROM inventory i WHERE i.film_id = f.film_id)
                 - (SELECT COUNT(*)
                    FROM rental r
                    JOIN inventory i ON i.inventory_id = r.inventory_id
                    WHERE i.film_id = f.film_id AND r.return_date IS NULL) AS available_to_rent
            FROM film f
            WHERE f.title ILIKE '%' || $1 || '%' OR f.description ILIKE '%' || $1 || '%'
            ORDER BY f.release_year {}, f.film_id
            LIMIT $2 OFFSET $3
            "#,
            query.sort.as_sql()
        );

        with_timeout(
            timeouts::CATALOG,
            sqlx::query_as::<_, Movie>(&sql)
                .bind(&query.search)
                .bind(query.limit)
                .bind(query.offset)
                .fetch_all(&self.db),
        )
        .await
    }
}
