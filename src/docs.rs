use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::openapi::server::Server;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::modules::health::model::{HealthResponse, HealthStatus};
use crate::state::AppState;
use dvdrental_models::{
    CreateCustomerPayload, Movie, MoviesResponse, RegisterUserPayload, Rental, RentalResponse,
    SignInPayload, SortOrder, TokenResponse,
};

/// Error envelope shared by every non-2xx response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::sign_in_user,
        crate::modules::customers::controller::create_customer,
        crate::modules::movies::controller::get_movies,
        crate::modules::rentals::controller::get_rental_by_id,
    ),
    components(
        schemas(
            HealthResponse,
            HealthStatus,
            RegisterUserPayload,
            SignInPayload,
            TokenResponse,
            CreateCustomerPayload,
            Movie,
            MoviesResponse,
            SortOrder,
            Rental,
            RentalResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Authentication", description = "Registration and sign-in"),
        (name = "Customers", description = "Customer management, admin only"),
        (name = "Movies", description = "Film catalog with availability"),
        (name = "Rentals", description = "Rental lookup, admin only")
    ),
    info(
        title = "DVD Rental API",
        version = "0.1.0",
        description = "REST API over the dvdrental sample database with bearer token authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Serves the generated OpenAPI document with `API_URL` as its server.
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(server_url(&state.app_config.api_url))]);
    Json(doc)
}

fn server_url(api_url: &str) -> String {
    if api_url.starts_with("http://") || api_url.starts_with("https://") {
        api_url.to_string()
    } else {
        format!("http://{api_url}")
    }
}
