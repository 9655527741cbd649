use payment_service_tools::PaymentResponse;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderItem, OrderUpdate, PaymentStatus, Tracking},
    order_objects::{OrderQueryFilter, Pagination},
    traits::CatalogApiError,
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("Invalid request. {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    CatalogError(#[from] CatalogApiError),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines the storage behaviour for orders, their line items and their tracking
/// history.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a new order with status `created` and payment status `pending`, together with its line items and an
    /// initial `created` tracking entry, in a single atomic transaction.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError>;

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError>;

    /// The line items of the order, in the order they were placed.
    async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderFlowError>;

    /// Fetches the orders matching `query`, oldest first. The filters are applied before the page is selected.
    async fn search_orders(&self, query: OrderQueryFilter, page: Pagination) -> Result<Vec<Order>, OrderFlowError>;

    /// Applies the non-empty fields of `update` and refreshes `updated_at`. A change of `status` is appended to the
    /// tracking history. Returns `None` if the order does not exist.
    ///
    /// Callers are expected to strip fields that would not change the order first, using
    /// [`OrderUpdate::changes_for`]; an empty update returns the order untouched.
    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Option<Order>, OrderFlowError>;

    /// Stores the result of a payment request against the order.
    async fn record_payment_outcome(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
        payment: Option<&PaymentResponse>,
    ) -> Result<Order, OrderFlowError>;

    async fn insert_tracking(&self, id: OrderId, label: &str) -> Result<Tracking, OrderFlowError>;

    /// The tracking history for the order, oldest first.
    async fn fetch_tracking(&self, id: OrderId) -> Result<Vec<Tracking>, OrderFlowError>;

    /// Removes the order, its line items and its tracking history. Returns `false` if there was no such order.
    async fn delete_order(&self, id: OrderId) -> Result<bool, OrderFlowError>;
}
