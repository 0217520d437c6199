use crate::modules::customers::controller::create_customer;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_customers_router() -> Router<AppState> {
    Router::new().route("/", post(create_customer))
}
