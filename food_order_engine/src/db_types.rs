use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fos_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| ConversionError(format!("Invalid order id: {s}. {e}")))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The order lifecycle.
///
/// `Created` is the initial state and is only ever assigned when an order is placed. Every other state can be set by
/// an operator through a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    Created,
    /// Placed and waiting for payment
    Requested,
    Paid,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    /// Cancelled before payment
    Cancelled,
    /// Cancelled after payment, and the money returned
    Refunded,
    /// Turned down by the restaurant (out of stock etc.)
    Rejected,
}

impl OrderStatusType {
    /// The states an operator may move an order into.
    pub const ASSIGNABLE: [OrderStatusType; 9] = [
        Self::Requested,
        Self::Paid,
        Self::Preparing,
        Self::ReadyForPickup,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
        Self::Rejected,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded | Self::Rejected)
    }

    pub fn is_assignable(&self) -> bool {
        !matches!(self, Self::Created)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Requested => "requested",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "requested" => Ok(Self::Requested),
            "paid" => Ok(Self::Paid),
            "preparing" => Ok(Self::Preparing),
            "ready_for_pickup" => Ok(Self::ReadyForPickup),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
/// The payment lifecycle of an order. This is tracked independently of [`OrderStatusType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    InProcess,
    Refunded,
    /// The payment service issued a payment link for the order. Set by the order workflow only.
    AwaitingPayment,
    /// The payment service could not be reached when the order was placed. Set by the order workflow only.
    PaymentServiceUnavailable,
}

impl PaymentStatus {
    /// Values that describe the interaction with the payment service rather than the payer's actual payment state.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::AwaitingPayment | Self::PaymentServiceUnavailable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InProcess => "in_process",
            Self::Refunded => "refunded",
            Self::AwaitingPayment => "awaiting_payment",
            Self::PaymentServiceUnavailable => "payment_service_unavailable",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "in_process" => Ok(Self::InProcess),
            "refunded" => Ok(Self::Refunded),
            "awaiting_payment" => Ok(Self::AwaitingPayment),
            "payment_service_unavailable" => Ok(Self::PaymentServiceUnavailable),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------       Category        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

impl CategoryUpdate {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.enabled.is_none()
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category_id: i64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    pub category_id: i64,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Money, category_id: i64) -> Self {
        Self { name: name.into(), description: None, price, category_id }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category_id: Option<i64>,
    pub enabled: Option<bool>,
}

impl ProductUpdate {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() &&
            self.description.is_none() &&
            self.price.is_none() &&
            self.category_id.is_none() &&
            self.enabled.is_none()
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: i64,
    pub status: OrderStatusType,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub payment_amount: Option<Money>,
    pub qr_code: Option<String>,
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(customer_id: i64) -> Self {
        Self { customer_id, items: Vec::new() }
    }

    pub fn with_item(mut self, item: NewOrderItem) -> Self {
        self.items.push(item);
        self
    }
}

/// A line item that is ready to be stored: the product has been checked and its current price captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub comment: Option<String>,
}

/// A set of changes to the lifecycle fields of an order. `None` fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatusType>,
    pub payment_status: Option<PaymentStatus>,
}

impl OrderUpdate {
    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = Some(payment_status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none()
    }

    /// Drops the fields that would not change `order`.
    pub fn changes_for(&self, order: &Order) -> Self {
        Self {
            status: self.status.filter(|s| *s != order.status),
            payment_status: self.payment_status.filter(|s| *s != order.payment_status),
        }
    }
}

//--------------------------------------       OrderItem       ---------------------------------------------------------
/// An order line, joined with the name of the product it refers to. `product_name` is `None` when the product record
/// no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub comment: Option<String>,
    pub product_name: Option<String>,
}

//--------------------------------------       Tracking        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Tracking {
    pub id: i64,
    pub order_id: OrderId,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
