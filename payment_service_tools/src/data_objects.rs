use std::fmt::Display;

use fos_common::{Money, DEFAULT_CURRENCY_CODE};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sent to the payment service when the customer has no contact email on record.
pub const PLACEHOLDER_EMAIL: &str = "customer@example.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// The order id, used by the payment service as its external reference.
    pub order_id: String,
    pub amount: Money,
    pub customer_id: i64,
    pub currency: String,
    pub email: String,
    pub description: String,
}

impl PaymentRequest {
    pub fn for_order<O: Display>(
        order_id: O,
        amount: Money,
        customer_id: i64,
        item_count: usize,
        email: Option<&str>,
    ) -> Self {
        let email = match email.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => PLACEHOLDER_EMAIL.to_string(),
        };
        Self {
            order_id: order_id.to_string(),
            amount,
            customer_id,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            email,
            description: format!("Order {order_id} - {item_count} items"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub payment_id: String,
    pub amount: Money,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub payment_link: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected a string or number for payment_id, got {other}"))),
    }
}

/// The result of [`crate::PaymentServiceApi::request_payment`]. Failure to reach the payment service is an expected
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Created(PaymentResponse),
    Unavailable { attempts: u32, last_error: String },
}

impl PaymentOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn response(&self) -> Option<&PaymentResponse> {
        match self {
            Self::Created(r) => Some(r),
            Self::Unavailable { .. } => None,
        }
    }
}
