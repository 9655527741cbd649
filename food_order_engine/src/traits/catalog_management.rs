use thiserror::Error;

use crate::{
    db_types::{Category, CategoryUpdate, NewProduct, Product, ProductUpdate},
    order_objects::Pagination,
};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Category {0} does not exist")]
    CategoryNotFound(i64),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("A category named '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Invalid request. {0}")]
    InvalidArgument(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// The `CatalogManagement` trait defines the storage behaviour for the product catalog.
///
/// Categories and products are never deleted. They are disabled instead, and disabled records are left out of the
/// listings. Fetching a single record by id returns it regardless of its `enabled` flag.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Creates a new, enabled category. Names are unique.
    async fn insert_category(&self, name: &str) -> Result<Category, CatalogApiError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;

    async fn fetch_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError>;

    /// Enabled categories only, in id order.
    async fn fetch_enabled_categories(&self, page: Pagination) -> Result<Vec<Category>, CatalogApiError>;

    /// Applies the non-empty fields of `update`. Returns `None` if the category does not exist.
    async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError>;

    /// Creates a new, enabled product. The category must exist.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;

    /// Product names are not unique. This returns the oldest product with the given name.
    async fn fetch_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogApiError>;

    /// Enabled products only, optionally restricted to a single category, in id order.
    async fn fetch_enabled_products(
        &self,
        category_id: Option<i64>,
        page: Pagination,
    ) -> Result<Vec<Product>, CatalogApiError>;

    /// Applies the non-empty fields of `update`. Returns `None` if the product does not exist.
    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError>;
}
