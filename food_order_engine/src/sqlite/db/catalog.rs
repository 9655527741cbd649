use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Category, CategoryUpdate, NewProduct, Product, ProductUpdate},
    order_objects::Pagination,
    traits::CatalogApiError,
};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id, enabled";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

//--------------------------------------      Categories       ---------------------------------------------------------

pub async fn insert_category(name: &str, conn: &mut SqliteConnection) -> Result<Category, CatalogApiError> {
    let result = sqlx::query_as("INSERT INTO categories (name, enabled) VALUES ($1, 1) RETURNING id, name, enabled")
        .bind(name)
        .fetch_one(conn)
        .await;
    match result {
        Ok(category) => Ok(category),
        Err(e) if is_unique_violation(&e) => Err(CatalogApiError::DuplicateCategory(name.to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, enabled FROM categories WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_category_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, enabled FROM categories WHERE name = $1").bind(name).fetch_optional(conn).await
}

pub async fn fetch_enabled_categories(
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, enabled FROM categories WHERE enabled = 1 ORDER BY id LIMIT $1 OFFSET $2")
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(conn)
        .await
}

pub async fn update_category(
    id: i64,
    update: CategoryUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Category>, CatalogApiError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for category {id}. Update request skipped.");
        return Ok(fetch_category(id, conn).await?);
    }
    let name = update.name.clone();
    let mut builder = QueryBuilder::new("UPDATE categories SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(enabled) = update.enabled {
        set_clause.push("enabled = ");
        set_clause.push_bind_unseparated(enabled);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING id, name, enabled");
    trace!("🗃️ Executing query: {}", builder.sql());
    match builder.build_query_as::<Category>().fetch_optional(conn).await {
        Ok(category) => Ok(category),
        Err(e) if is_unique_violation(&e) => Err(CatalogApiError::DuplicateCategory(name.unwrap_or_default())),
        Err(e) => Err(e.into()),
    }
}

//--------------------------------------       Products        ---------------------------------------------------------

/// Inserts a new product. The category must exist.
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    if fetch_category(product.category_id, &mut *conn).await?.is_none() {
        return Err(CatalogApiError::CategoryNotFound(product.category_id));
    }
    let sql = format!(
        "INSERT INTO products (name, description, price, category_id, enabled) VALUES ($1, $2, $3, $4, 1) RETURNING \
         {PRODUCT_COLUMNS}"
    );
    let product = sqlx::query_as(&sql)
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.category_id)
        .fetch_one(conn)
        .await?;
    Ok(product)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(conn).await
}

pub async fn fetch_product_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1 ORDER BY id LIMIT 1");
    sqlx::query_as(&sql).bind(name).fetch_optional(conn).await
}

pub async fn fetch_enabled_products(
    category_id: Option<i64>,
    page: Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE enabled = 1"));
    if let Some(category_id) = category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(category_id);
    }
    builder.push(" ORDER BY id LIMIT ");
    builder.push_bind(page.limit);
    builder.push(" OFFSET ");
    builder.push_bind(page.skip);
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<Product>().fetch_all(conn).await
}

pub async fn update_product(
    id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, CatalogApiError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for product {id}. Update request skipped.");
        return Ok(fetch_product(id, conn).await?);
    }
    if let Some(category_id) = update.category_id {
        if fetch_category(category_id, &mut *conn).await?.is_none() {
            return Err(CatalogApiError::CategoryNotFound(category_id));
        }
    }
    let mut builder = QueryBuilder::new("UPDATE products SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(category_id) = update.category_id {
        set_clause.push("category_id = ");
        set_clause.push_bind_unseparated(category_id);
    }
    if let Some(enabled) = update.enabled {
        set_clause.push("enabled = ");
        set_clause.push_bind_unseparated(enabled);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {PRODUCT_COLUMNS}"));
    trace!("🗃️ Executing query: {}", builder.sql());
    let product = builder.build_query_as::<Product>().fetch_optional(conn).await?;
    Ok(product)
}
