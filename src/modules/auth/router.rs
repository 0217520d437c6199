use crate::modules::auth::controller::{register_user, sign_in_user};
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/sign-in", post(sign_in_user))
}
