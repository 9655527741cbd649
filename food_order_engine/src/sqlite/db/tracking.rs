use chrono::{DateTime, Utc};
use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{OrderId, Tracking};

pub async fn insert_tracking(
    order_id: OrderId,
    label: &str,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Tracking, sqlx::Error> {
    let tracking = sqlx::query_as(
        "INSERT INTO tracking (order_id, status, created_at) VALUES ($1, $2, $3) RETURNING id, order_id, status, \
         created_at",
    )
    .bind(order_id)
    .bind(label)
    .bind(now)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Tracking entry '{label}' added to order #{order_id}");
    Ok(tracking)
}

pub async fn fetch_tracking(order_id: OrderId, conn: &mut SqliteConnection) -> Result<Vec<Tracking>, sqlx::Error> {
    sqlx::query_as("SELECT id, order_id, status, created_at FROM tracking WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await
}
