use std::str::FromStr;

use food_order_engine::{
    db_types::{OrderId, OrderStatusType},
    order_objects::{OrderQueryFilter, Pagination, DEFAULT_PAGE_SIZE},
};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListParams {
    /// Shortcut to a single order. The other parameters are ignored when this is present.
    pub order_id: Option<OrderId>,
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

impl OrderListParams {
    pub fn filter(&self) -> Result<OrderQueryFilter, ServerError> {
        let mut filter = OrderQueryFilter::default();
        if let Some(customer_id) = self.customer_id {
            filter = filter.with_customer_id(customer_id);
        }
        if let Some(status) = &self.status {
            let status = OrderStatusType::from_str(status).map_err(|e| ServerError::InvalidArgument(e.to_string()))?;
            filter = filter.with_status(status);
        }
        Ok(filter)
    }

    pub fn page(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListParams {
    /// Shortcut to a single product. The other parameters are ignored when this is present.
    pub product_id: Option<i64>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

impl ProductListParams {
    pub fn page(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

/// Query parameters for `GET /category`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryListParams {
    /// Shortcut to a single category. The other parameters are ignored when this is present.
    pub category_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

impl CategoryListParams {
    pub fn page(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEventRequest {
    pub status: String,
}
