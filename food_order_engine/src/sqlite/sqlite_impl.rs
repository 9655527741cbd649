//! `SqliteDatabase` is a concrete implementation of a food ordering engine backend.
//!
//! It uses SQLite as the backend and implements the storage traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use payment_service_tools::PaymentResponse;
use sqlx::SqlitePool;

use super::db::{catalog, new_pool, orders, tracking};
use crate::{
    db_types::{
        Category,
        CategoryUpdate,
        NewOrder,
        NewProduct,
        Order,
        OrderId,
        OrderItem,
        OrderStatusType,
        OrderUpdate,
        PaymentStatus,
        Product,
        ProductUpdate,
        Tracking,
    },
    order_objects::{OrderQueryFilter, Pagination},
    traits::{CatalogApiError, CatalogManagement, OrderFlowError, OrderManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_category(&self, name: &str) -> Result<Category, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let category = catalog::insert_category(name, &mut conn).await?;
        debug!("🗃️ Category #{} '{}' created", category.id, category.name);
        Ok(category)
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let category = catalog::fetch_category(id, &mut conn).await?;
        Ok(category)
    }

    async fn fetch_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let category = catalog::fetch_category_by_name(name, &mut conn).await?;
        Ok(category)
    }

    async fn fetch_enabled_categories(&self, page: Pagination) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let categories = catalog::fetch_enabled_categories(page, &mut conn).await?;
        Ok(categories)
    }

    async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::update_category(id, update, &mut conn).await
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let product = catalog::insert_product(product, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Product #{} '{}' created at {}", product.id, product.name, product.price);
        Ok(product)
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = catalog::fetch_product(id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = catalog::fetch_product_by_name(name, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_enabled_products(
        &self,
        category_id: Option<i64>,
        page: Pagination,
    ) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let products = catalog::fetch_enabled_products(category_id, page, &mut conn).await?;
        Ok(products)
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let product = catalog::update_product(id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let inserted = orders::insert_order(order.customer_id, now, &mut tx).await?;
        orders::insert_order_items(inserted.id, &order.items, &mut tx).await?;
        tracking::insert_tracking(inserted.id, OrderStatusType::Created.as_str(), now, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} with {} items has been saved in the DB", inserted.id, order.items.len());
        Ok(inserted)
    }

    async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_order_items(id, &mut conn).await?;
        Ok(items)
    }

    async fn search_orders(&self, query: OrderQueryFilter, page: Pagination) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, page, &mut conn).await?;
        Ok(orders)
    }

    async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Option<Order>, OrderFlowError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order(id, update, now, &mut tx).await?;
        if let (Some(_), Some(status)) = (&order, update.status) {
            tracking::insert_tracking(id, status.as_str(), now, &mut tx).await?;
        }
        tx.commit().await?;
        if let Some(order) = &order {
            debug!("🗃️ Order #{id} is now {} / {}", order.status, order.payment_status);
        }
        Ok(order)
    }

    async fn record_payment_outcome(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
        payment: Option<&PaymentResponse>,
    ) -> Result<Order, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_payment(id, payment_status, payment, Utc::now(), &mut conn)
            .await?
            .ok_or(OrderFlowError::OrderNotFound(id))?;
        debug!("🗃️ Payment status for order #{id} set to {payment_status}");
        Ok(order)
    }

    async fn insert_tracking(&self, id: OrderId, label: &str) -> Result<Tracking, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        if orders::fetch_order(id, &mut tx).await?.is_none() {
            return Err(OrderFlowError::OrderNotFound(id));
        }
        let entry = tracking::insert_tracking(id, label, Utc::now(), &mut tx).await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn fetch_tracking(&self, id: OrderId) -> Result<Vec<Tracking>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let entries = tracking::fetch_tracking(id, &mut conn).await?;
        Ok(entries)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = orders::delete_order(id, &mut conn).await?;
        if deleted {
            info!("🗃️ Order #{id} and its items have been deleted");
        }
        Ok(deleted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}
