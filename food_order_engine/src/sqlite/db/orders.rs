use chrono::{DateTime, Utc};
use log::{debug, trace};
use payment_service_tools::PaymentResponse;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrderItem, Order, OrderId, OrderItem, OrderStatusType, OrderUpdate, PaymentStatus},
    order_objects::{OrderQueryFilter, Pagination},
};

const ORDER_COLUMNS: &str =
    "id, customer_id, status, payment_status, payment_id, payment_amount, qr_code, payment_link, created_at, updated_at";

/// Inserts a new order row with status `created` and payment status `pending`. This is not atomic. Embed this call in
/// a transaction, along with [`insert_order_items`], and pass `&mut *tx` as the connection argument.
pub async fn insert_order(
    customer_id: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let sql = format!(
        "INSERT INTO orders (customer_id, status, payment_status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5) \
         RETURNING {ORDER_COLUMNS}"
    );
    let order: Order = sqlx::query_as(&sql)
        .bind(customer_id)
        .bind(OrderStatusType::Created)
        .bind(PaymentStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Order #{} inserted for customer {customer_id}", order.id);
    Ok(order)
}

pub async fn insert_order_items(
    order_id: OrderId,
    items: &[NewOrderItem],
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    if items.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("INSERT INTO order_items (order_id, product_id, quantity, unit_price, comment) ");
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id)
            .push_bind(item.product_id)
            .push_bind(item.quantity)
            .push_bind(item.unit_price)
            .push_bind(item.comment.clone());
    });
    let result = builder.build().execute(conn).await?;
    trace!("🗃️ {} items inserted for order #{order_id}", result.rows_affected());
    Ok(result.rows_affected())
}

pub async fn fetch_order(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(conn).await
}

/// The line items for an order, joined with their product names, in insertion order.
pub async fn fetch_order_items(id: OrderId, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            order_items.id,
            order_items.order_id,
            order_items.product_id,
            order_items.quantity,
            order_items.unit_price,
            order_items.comment,
            products.name AS product_name
        FROM order_items
        LEFT JOIN products ON products.id = order_items.product_id
        WHERE order_items.order_id = $1
        ORDER BY order_items.id ASC
        "#,
    )
    .bind(id)
    .fetch_all(conn)
    .await
}

/// Fetches orders according to the criteria in the `OrderQueryFilter`.
///
/// The filters are part of the `WHERE` clause, so the page is taken from the filtered result set. Orders are sorted
/// by id, i.e. oldest first.
pub async fn search_orders(
    query: OrderQueryFilter,
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders "));
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(customer_id) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(customer_id);
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status);
    }
    builder.push(" ORDER BY id ASC LIMIT ");
    builder.push_bind(page.limit);
    builder.push(" OFFSET ");
    builder.push_bind(page.skip);
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {}", orders.len());
    Ok(orders)
}

/// Applies the non-empty fields of `update` and sets `updated_at` to `now`.
pub async fn update_order(
    id: OrderId,
    update: OrderUpdate,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for order #{id}. Update request skipped.");
        return fetch_order(id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE orders SET updated_at = ");
    builder.push_bind(now);
    if let Some(status) = update.status {
        builder.push(", status = ");
        builder.push_bind(status);
    }
    if let Some(payment_status) = update.payment_status {
        builder.push(", payment_status = ");
        builder.push_bind(payment_status);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {ORDER_COLUMNS}"));
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<Order>().fetch_optional(conn).await
}

/// Stores the payment status and, if a payment was created, its details.
pub async fn update_payment(
    id: OrderId,
    payment_status: PaymentStatus,
    payment: Option<&PaymentResponse>,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let sql = format!(
        "UPDATE orders SET payment_status = $1, payment_id = $2, payment_amount = $3, qr_code = $4, payment_link = \
         $5, updated_at = $6 WHERE id = $7 RETURNING {ORDER_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(payment_status)
        .bind(payment.map(|p| p.payment_id.clone()))
        .bind(payment.map(|p| p.amount))
        .bind(payment.and_then(|p| p.qr_code.clone()))
        .bind(payment.and_then(|p| p.payment_link.clone()))
        .bind(now)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Deletes the order. Line items and tracking entries go with it (`ON DELETE CASCADE`).
pub async fn delete_order(id: OrderId, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
