use axum::Json;
use axum::extract::State;
use dvdrental_core::AppError;
use dvdrental_models::{MovieQueryParams, MoviesResponse};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

/// List movies with rentable copy counts
#[utoipa::path(
    get,
    path = "/v1/movies",
    params(MovieQueryParams),
    responses(
        (status = 200, description = "Movies page", body = MoviesResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
#[instrument(skip(state))]
pub async fn get_movies(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<MovieQueryParams>,
) -> Result<Json<MoviesResponse>, AppError> {
    let movies = state
        .store
        .movies
        .get_movies(&params.into())
        .await
        .map_err(AppError::internal)?;

    Ok(Json(MoviesResponse { data: movies }))
}
