use crate::modules::rentals::controller::get_rental_by_id;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_rentals_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_rental_by_id))
}
