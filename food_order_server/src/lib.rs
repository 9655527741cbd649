//! # Food order server
//! This crate hosts the HTTP server for the food ordering backend. It is responsible for:
//! * Authenticating every request against the external auth service.
//! * Parsing requests and handing them to the [`food_order_engine`] APIs.
//! * Turning engine results and errors into JSON responses.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A liveness probe. It does not require authentication.
//! * `/orders`, `/orders/{id}` and `/orders/{id}/tracking`: Place orders, query them and move them through their
//!   lifecycle.
//! * `/products`, `/products/{id}`, `/category` and `/category/{id}`: Catalog maintenance.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
