use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i64,
    pub rental_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub inventory_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalResponse {
    pub data: Rental,
}
