pub mod controller;
pub mod identity;
pub mod router;
pub mod service;
