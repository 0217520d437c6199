//! # DVD Rental API
//!
//! A REST API over the PostgreSQL `dvdrental` sample database, built with
//! Axum and sqlx.
//!
//! ## Overview
//!
//! Staff and customers already exist as rows in the `staff` and `customer`
//! tables. Registration turns one of those rows into a login: the email is
//! looked up, classified, and a `users` row is created and linked back to it.
//!
//! | Provisioned as | Role | Can reach |
//! |----------------|------|-----------|
//! | staff | `admin` | everything |
//! | customer | `customer` | health, auth, movies |
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer auth, role gate, rate limiter, panic handler
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Identity resolution, register, sign-in
//! │   ├── customers/   # Customer creation (admin)
//! │   ├── health/      # Liveness
//! │   ├── movies/      # Catalog with availability
//! │   ├── rentals/     # Rental lookup (admin)
//! │   ├── roles/       # Role repository
//! │   ├── staff/       # Staff repository
//! │   └── users/       # User repository
//! ├── cache.rs          # Optional Redis cache of resolved users
//! ├── store.rs          # Repository aggregate
//! └── validator.rs      # Validating JSON and query extractors
//! ```
//!
//! Feature modules follow the same layout: `service.rs` holds the repository
//! trait and its PostgreSQL implementation, `controller.rs` the handlers and
//! `router.rs` the Axum routes.
//!
//! ## Authentication
//!
//! `POST /v1/auth/sign-in` returns an HS256 token whose subject is the user
//! id. Protected routes verify it, load the user and re-read its role from the
//! database on every request, so demoting a role takes effect immediately.
//!
//! ## Modules
//!
//! - [`cache`]: user cache abstraction and its Redis implementation
//! - [`docs`]: OpenAPI document
//! - [`logging`]: tracing setup and request logging
//! - [`metrics`]: Prometheus metrics
//! - [`middleware`]: authentication, authorization and rate limiting
//! - [`modules`]: feature modules
//! - [`router`]: the application router
//! - [`state`]: shared application state
//! - [`store`]: repository aggregate and store errors
//! - [`validator`]: request validation

pub mod cache;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod store;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use dvdrental_auth;
pub use dvdrental_config;
pub use dvdrental_core;
pub use dvdrental_models;
