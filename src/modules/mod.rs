pub mod auth;
pub mod customers;
pub mod health;
pub mod movies;
pub mod rentals;
pub mod roles;
pub mod staff;
pub mod users;
