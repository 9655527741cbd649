//! The public API of the engine.
//!
//! [`catalog_api::CatalogApi`] manages categories and products. [`order_flow_api::OrderFlowApi`] places orders, asks
//! the payment service for a payment link and moves orders through their lifecycle. Both are generic over the storage
//! traits in [`crate::traits`].
pub mod catalog_api;
pub mod catalog_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod seed;
