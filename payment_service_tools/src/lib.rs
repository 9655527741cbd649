//! # Payment service tools
//!
//! A small client for the external payment service. The service issues a payable link and/or QR code for an order
//! amount; money movement is entirely its concern.
//!
//! * [`PaymentServiceApi`] sends a single payment request, or a bounded sequence of them with
//!   [`PaymentServiceApi::request_payment`].
//! * [`RetryPolicy`] bounds the number of attempts, the time each attempt may take, and the pause between attempts.
mod api;
mod config;
mod data_objects;
mod error;
mod retry;

pub use api::PaymentServiceApi;
pub use config::PaymentServiceConfig;
pub use data_objects::{PaymentOutcome, PaymentRequest, PaymentResponse, PLACEHOLDER_EMAIL};
pub use error::PaymentServiceError;
pub use retry::{retry_with_backoff, RetryPolicy};
