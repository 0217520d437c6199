use anyhow::anyhow;
use axum::Json;
use axum::extract::{Path, State};
use dvdrental_core::AppError;
use dvdrental_models::RentalResponse;
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::store::StoreError;

/// Fetch a rental by id
#[utoipa::path(
    get,
    path = "/v1/rentals/{id}",
    params(("id" = i64, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Rental found", body = RentalResponse),
        (status = 400, description = "Id is not a number", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, or not an admin", body = ErrorResponse),
        (status = 404, description = "No such rental", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
#[instrument(skip(state))]
pub async fn get_rental_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RentalResponse>, AppError> {
    let rental_id: i64 = id
        .parse()
        .map_err(|e| AppError::bad_request(anyhow!("invalid rental id {id:?}: {e}")))?;

    match state.store.rentals.get_rental_by_id(rental_id).await {
        Ok(rental) => Ok(Json(RentalResponse { data: rental })),
        Err(StoreError::NotFound) => Err(AppError::not_found(anyhow!("rental {rental_id} not found"))),
        Err(e) => Err(AppError::internal(e)),
    }
}
