//! # Storage and collaborator contracts
//!
//! The engine APIs are generic over these traits, so that the storage backend and the payment service can be swapped
//! out (for mocks in tests, say) without touching the order workflow.
//!
//! * [`CatalogManagement`] stores categories and products.
//! * [`OrderManagement`] stores orders, their line items and their tracking history.
//! * [`PaymentGateway`] asks an external payment service for a payment link for an order.
mod catalog_management;
mod order_management;
mod payment_gateway;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use order_management::{OrderFlowError, OrderManagement};
pub use payment_gateway::PaymentGateway;
