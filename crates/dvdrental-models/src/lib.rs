//! # DVD Rental Models
//!
//! Domain entities, database rows and request/response DTOs.
//!
//! - [`auth`]: registration and sign-in payloads
//! - [`customers`]: customer records and the create-customer payload
//! - [`movies`]: film listing rows and query parameters
//! - [`rentals`]: rental records
//! - [`roles`]: the closed [`RoleName`] enumeration and role rows
//! - [`staff`]: staff records
//! - [`users`]: the unified [`User`] identity

pub mod auth;
pub mod customers;
pub mod movies;
pub mod rentals;
pub mod roles;
pub mod staff;
pub mod users;

pub use auth::{Credentials, Registration, RegisterUserPayload, SignInPayload, TokenResponse};
pub use customers::{CreateCustomerPayload, Customer, NewCustomer};
pub use movies::{Movie, MovieQuery, MovieQueryParams, MoviesResponse, SortOrder};
pub use rentals::{Rental, RentalResponse};
pub use roles::{Role, RoleName, RoleRow, UnknownRole};
pub use staff::Staff;
pub use users::{AccountLink, NewUser, User, UserRecord};
