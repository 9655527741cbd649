use std::fmt::Display;

use chrono::{DateTime, Utc};
use fos_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderId, OrderItem, OrderStatusType, PaymentStatus};

/// Shown in place of the product name when an order line refers to a product that no longer exists.
pub const PRODUCT_NOT_FOUND: &str = "product not found";

pub const DEFAULT_PAGE_SIZE: i64 = 10;

//--------------------------------------      Pagination       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }

    pub fn is_valid(&self) -> bool {
        self.skip >= 0 && self.limit > 0
    }
}

impl Display for Pagination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skip={}, limit={}", self.skip, self.limit)
    }
}

//--------------------------------------   OrderQueryFilter    ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatusType>,
}

impl OrderQueryFilter {
    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.status.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(customer_id) = &self.customer_id {
            write!(f, "customer_id: {customer_id}. ")?;
        }
        if let Some(status) = &self.status {
            write!(f, "status: {status}. ")?;
        }
        Ok(())
    }
}

//--------------------------------------    Order requests     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub customer_id: i64,
    pub order_items: Vec<LineItem>,
    /// Contact email passed on to the payment service
    #[serde(default)]
    pub email: Option<String>,
}

impl NewOrderRequest {
    pub fn new(customer_id: i64) -> Self {
        Self { customer_id, order_items: Vec::new(), email: None }
    }

    pub fn with_item(mut self, product_id: i64, quantity: i64) -> Self {
        self.order_items.push(LineItem { product_id, quantity, comment: None });
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Free text from the customer, e.g. "no onions"
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// A manual change to an order's lifecycle fields. Values are validated against their respective closed sets by the
/// order workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl StatusUpdateRequest {
    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_payment_status<S: Into<String>>(mut self, payment_status: S) -> Self {
        self.payment_status = Some(payment_status.into());
        self
    }
}

//--------------------------------------        Views          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: i64,
    /// `None` when the product no longer exists
    pub product_id: Option<i64>,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub comment: Option<String>,
}

impl From<OrderItem> for ItemView {
    fn from(item: OrderItem) -> Self {
        match item.product_name {
            Some(name) => Self {
                id: item.id,
                product_id: Some(item.product_id),
                name,
                price: item.unit_price,
                quantity: item.quantity,
                comment: item.comment,
            },
            None => Self {
                id: item.id,
                product_id: None,
                name: PRODUCT_NOT_FOUND.to_string(),
                price: Money::default(),
                quantity: item.quantity,
                comment: item.comment,
            },
        }
    }
}

impl ItemView {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// An order, its items and its payment details, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_id: i64,
    pub status: OrderStatusType,
    pub payment_status: PaymentStatus,
    /// The sum of the item totals, unless the payment service quoted an amount when the order was placed.
    pub amount: Money,
    pub payment_id: Option<String>,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ItemView>,
}

impl OrderView {
    /// Builds the view for a stored order. The amount is always recomputed from the items.
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let items = items.into_iter().map(ItemView::from).collect::<Vec<_>>();
        let amount = items.iter().map(ItemView::line_total).sum();
        Self {
            id: order.id,
            customer_id: order.customer_id,
            status: order.status,
            payment_status: order.payment_status,
            amount,
            payment_id: order.payment_id,
            qr_code: order.qr_code,
            payment_link: order.payment_link,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
        }
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }
}
