//! Request middleware.
//!
//! - [`auth`]: bearer token verification and the [`CurrentUser`](auth::CurrentUser) extension
//! - [`role`]: role gates layered after `auth`
//! - [`rate_limit`]: per-client fixed-window limiter
//! - [`panic`]: turns handler panics into the JSON 500 envelope
//!
//! Protected routers apply `require_auth` outermost and a role gate inside it:
//!
//! ```ignore
//! init_rentals_router()
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;
pub mod panic;
pub mod rate_limit;
pub mod role;
