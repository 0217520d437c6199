use crate::docs::openapi_json;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_auth;
use crate::middleware::panic::handle_panic;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::customers::router::init_customers_router;
use crate::modules::health::router::init_health_router;
use crate::modules::movies::router::init_movies_router;
use crate::modules::rentals::router::init_rentals_router;
use crate::state::AppState;
use crate::validator::MAX_BODY_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use dvdrental_config::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/v1",
            Router::new()
                .nest("/health", init_health_router())
                .nest("/auth", init_auth_router())
                .route("/openapi.json", get(openapi_json))
                .nest(
                    "/movies",
                    init_movies_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
                )
                .nest(
                    "/customers",
                    init_customers_router()
                        .route_layer(middleware::from_fn(require_admin))
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
                )
                .nest(
                    "/rentals",
                    init_rentals_router()
                        .route_layer(middleware::from_fn(require_admin))
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
                ),
        )
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // A wildcard origin cannot be combined with credentials.
    if config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(allowed_origins)
        .allow_credentials(true)
}
