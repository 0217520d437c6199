use crate::modules::movies::controller::get_movies;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_movies_router() -> Router<AppState> {
    Router::new().route("/", get(get_movies))
}
