use std::{collections::HashMap, fmt::Debug, str::FromStr};

use fos_common::Money;
use log::*;
use payment_service_tools::{PaymentOutcome, PaymentRequest};

use crate::{
    db_types::{NewOrder, NewOrderItem, OrderId, OrderStatusType, OrderUpdate, PaymentStatus, Product, Tracking},
    order_objects::{NewOrderRequest, OrderQueryFilter, OrderView, Pagination, StatusUpdateRequest},
    traits::{CatalogManagement, OrderFlowError, OrderManagement, PaymentGateway},
};

/// `OrderFlowApi` is the primary API for placing orders and moving them through their lifecycle.
///
/// * `B` stores the orders.
/// * `C` is the product catalog, used to check and price the items of a new order.
/// * `G` issues payment links for new orders.
pub struct OrderFlowApi<B, C, G> {
    db: B,
    catalog: C,
    gateway: G,
}

impl<B, C, G> Debug for OrderFlowApi<B, C, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, C, G> OrderFlowApi<B, C, G>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    pub fn new(db: B, catalog: C, gateway: G) -> Self {
        Self { db, catalog, gateway }
    }

    /// Places a new order and asks the payment service for a payment link.
    ///
    /// The order, its items and its first tracking entry are committed before the payment service is contacted, so
    /// the order survives a payment service outage. The outcome of the payment request is recorded in the order's
    /// `payment_status`:
    /// * `awaiting_payment` if a payment was created. The payment details are stored on the order, and the returned
    ///   view carries the amount quoted by the payment service.
    /// * `payment_service_unavailable` if every attempt failed. This is not an error: the order is returned with the
    ///   computed amount and no payment details.
    pub async fn create_order(&self, request: NewOrderRequest) -> Result<OrderView, OrderFlowError> {
        let new_order = self.prepare_order(&request).await?;
        let item_count = new_order.items.len();
        let order = self.db.insert_order(new_order).await?;
        let id = order.id;
        debug!("🔄️📦️ Order #{id} for customer {} stored with {item_count} items", order.customer_id);
        let items = self.db.fetch_order_items(id).await?;
        let total = OrderView::new(order, items.clone()).amount;
        let payment_request =
            PaymentRequest::for_order(id, total, request.customer_id, item_count, request.email.as_deref());
        let view = match self.gateway.request_payment(&payment_request).await {
            PaymentOutcome::Created(payment) => {
                let order = self.db.record_payment_outcome(id, PaymentStatus::AwaitingPayment, Some(&payment)).await?;
                info!("🔄️💳️ Order #{id} is awaiting payment {} of {}", payment.payment_id, payment.amount);
                OrderView::new(order, items).with_amount(payment.amount)
            },
            PaymentOutcome::Unavailable { attempts, last_error } => {
                let order = self.db.record_payment_outcome(id, PaymentStatus::PaymentServiceUnavailable, None).await?;
                warn!(
                    "🔄️💳️ No payment could be created for order #{id} after {attempts} attempts. The order has been \
                     kept. Last error: {last_error}"
                );
                OrderView::new(order, items)
            },
        };
        Ok(view)
    }

    /// Checks the items of a new order and captures the current price of each product.
    async fn prepare_order(&self, request: &NewOrderRequest) -> Result<NewOrder, OrderFlowError> {
        if request.order_items.is_empty() {
            return Err(OrderFlowError::InvalidArgument("An order must contain at least one item".into()));
        }
        if let Some(item) = request.order_items.iter().find(|i| i.quantity < 1) {
            return Err(OrderFlowError::InvalidArgument(format!(
                "Quantity for product {} must be at least 1, not {}",
                item.product_id, item.quantity
            )));
        }
        let mut products = HashMap::<i64, Product>::new();
        let mut order = NewOrder::new(request.customer_id);
        let mut total = Money::default();
        for item in &request.order_items {
            let product = match products.get(&item.product_id) {
                Some(p) => p.clone(),
                None => {
                    let p = self
                        .catalog
                        .fetch_product(item.product_id)
                        .await?
                        .ok_or(OrderFlowError::ProductNotFound(item.product_id))?;
                    if !p.enabled {
                        warn!("🔄️📦️ Customer {} is ordering disabled product #{}", request.customer_id, p.id);
                    }
                    products.insert(p.id, p.clone());
                    p
                },
            };
            total = product
                .price
                .checked_mul(item.quantity)
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| {
                    OrderFlowError::InvalidArgument(format!(
                        "Quantity {} of product {} puts the order total out of range",
                        item.quantity, item.product_id
                    ))
                })?;
            let comment = item.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(String::from);
            order = order.with_item(NewOrderItem {
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price,
                comment,
            });
        }
        trace!("🔄️📦️ New order for customer {} totals {total}", request.customer_id);
        Ok(order)
    }

    pub async fn get_order(&self, id: OrderId) -> Result<OrderView, OrderFlowError> {
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        let items = self.db.fetch_order_items(id).await?;
        Ok(OrderView::new(order, items))
    }

    /// Lists orders matching the filter, oldest first. The filter is applied before the page is selected.
    pub async fn list_orders(
        &self,
        query: OrderQueryFilter,
        page: Pagination,
    ) -> Result<Vec<OrderView>, OrderFlowError> {
        if !page.is_valid() {
            return Err(OrderFlowError::InvalidArgument(format!("Invalid page ({page})")));
        }
        trace!("🔄️📦️ Listing orders. {query} {page}");
        let orders = self.db.search_orders(query, page).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.fetch_order_items(order.id).await?;
            result.push(OrderView::new(order, items));
        }
        Ok(result)
    }

    /// Manually changes the status and/or payment status of an order.
    ///
    /// An unknown order is reported before the payload is looked at. Both values are then checked against their
    /// closed sets before anything is written. `created` cannot be assigned, and neither can the payment states that
    /// describe the interaction with the payment service. If the supplied values match the current ones, nothing is
    /// written and `updated_at` is left alone.
    pub async fn update_order_status(
        &self,
        id: OrderId,
        request: StatusUpdateRequest,
    ) -> Result<OrderView, OrderFlowError> {
        let order = self.db.fetch_order(id).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        let update = parse_status_update(&request)?;
        let changes = update.changes_for(&order);
        if changes.is_empty() {
            info!("🔄️📦️ Order #{id} already has status {} / {}. Nothing to do", order.status, order.payment_status);
            let items = self.db.fetch_order_items(id).await?;
            return Ok(OrderView::new(order, items));
        }
        let order = self.db.update_order(id, changes).await?.ok_or(OrderFlowError::OrderNotFound(id))?;
        info!("🔄️📦️ Order #{id} updated. Status: {}. Payment status: {}", order.status, order.payment_status);
        let items = self.db.fetch_order_items(id).await?;
        Ok(OrderView::new(order, items))
    }

    pub async fn add_tracking_event(&self, id: OrderId, label: &str) -> Result<Tracking, OrderFlowError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(OrderFlowError::InvalidArgument("Tracking label cannot be empty".into()));
        }
        let entry = self.db.insert_tracking(id, label).await?;
        debug!("🔄️📦️ Order #{id} tracking: {label}");
        Ok(entry)
    }

    /// The tracking history of the order, oldest first.
    pub async fn tracking_for_order(&self, id: OrderId) -> Result<Vec<Tracking>, OrderFlowError> {
        if self.db.fetch_order(id).await?.is_none() {
            return Err(OrderFlowError::OrderNotFound(id));
        }
        self.db.fetch_tracking(id).await
    }

    /// Removes an order together with its items and tracking history.
    pub async fn delete_order(&self, id: OrderId) -> Result<(), OrderFlowError> {
        if self.db.delete_order(id).await? {
            info!("🔄️📦️ Order #{id} deleted");
            Ok(())
        } else {
            Err(OrderFlowError::OrderNotFound(id))
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

fn parse_status_update(request: &StatusUpdateRequest) -> Result<OrderUpdate, OrderFlowError> {
    if request.status.is_none() && request.payment_status.is_none() {
        return Err(OrderFlowError::InvalidArgument("Supply a status and/or a payment_status to update".into()));
    }
    let mut update = OrderUpdate::default();
    if let Some(s) = &request.status {
        let status = OrderStatusType::from_str(s).map_err(|e| OrderFlowError::InvalidArgument(e.to_string()))?;
        if !status.is_assignable() {
            return Err(OrderFlowError::InvalidArgument(format!("An order cannot be moved to '{status}'")));
        }
        update = update.with_status(status);
    }
    if let Some(s) = &request.payment_status {
        let status = PaymentStatus::from_str(s).map_err(|e| OrderFlowError::InvalidArgument(e.to_string()))?;
        if status.is_operational() {
            return Err(OrderFlowError::InvalidArgument(format!("Payment status '{status}' is set by the system")));
        }
        update = update.with_payment_status(status);
    }
    Ok(update)
}
