use axum::Json;
use axum::extract::State;

use super::model::{HealthResponse, HealthStatus};
use crate::state::AppState;

/// Liveness probe with deployment metadata
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        data: HealthStatus {
            status: "ok".to_string(),
            environment: state.app_config.env.clone(),
            version: state.app_config.version.clone(),
        },
    })
}
