//! Food Order Engine
//!
//! This library holds the core logic of the food ordering backend. It knows nothing about HTTP.
//!
//! The library is divided into two main sections:
//! 1. Storage. The [`traits`] module defines what a backend has to provide, and the `sqlite` feature supplies
//!    [`SqliteDatabase`], the only backend at present. The data types used in the database live in [`db_types`].
//! 2. The public API. [`CatalogApi`] manages the product catalog and [`OrderFlowApi`] manages orders, including the
//!    call to the external payment service when an order is placed.
pub mod db_types;
mod fos_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use fos_api::{catalog_api::CatalogApi, catalog_objects, order_flow_api::OrderFlowApi, order_objects, seed};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{CatalogApiError, CatalogManagement, OrderFlowError, OrderManagement, PaymentGateway};
