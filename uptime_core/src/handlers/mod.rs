//! HTTP handlers

pub mod health;
pub mod integration;
pub mod routes;
pub mod tick;

pub use routes::create_routes;
