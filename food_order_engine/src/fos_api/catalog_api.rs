//! Categories and products.
use std::{collections::HashMap, fmt::Debug};

use log::*;

use crate::{
    db_types::{Category, CategoryUpdate, NewProduct, Product, ProductUpdate},
    fos_api::catalog_objects::ProductView,
    order_objects::Pagination,
    traits::{CatalogApiError, CatalogManagement},
};

/// `CatalogApi` validates and carries out changes to the product catalog, and builds the catalog views that are
/// returned to clients.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, CatalogApiError> {
        let name = validate_name(name)?;
        let category = self.db.insert_category(name).await?;
        info!("📚️ Category #{} '{}' created", category.id, category.name);
        Ok(category)
    }

    pub async fn category(&self, id: i64) -> Result<Category, CatalogApiError> {
        self.db.fetch_category(id).await?.ok_or(CatalogApiError::CategoryNotFound(id))
    }

    /// Enabled categories only.
    pub async fn categories(&self, page: Pagination) -> Result<Vec<Category>, CatalogApiError> {
        validate_page(&page)?;
        self.db.fetch_enabled_categories(page).await
    }

    pub async fn update_category(&self, id: i64, mut update: CategoryUpdate) -> Result<Category, CatalogApiError> {
        if update.is_empty() {
            return Err(CatalogApiError::InvalidArgument("No fields to update".into()));
        }
        if let Some(name) = update.name.take() {
            update.name = Some(validate_name(&name)?.to_string());
        }
        let category = self.db.update_category(id, update).await?.ok_or(CatalogApiError::CategoryNotFound(id))?;
        info!("📚️ Category #{id} updated");
        Ok(category)
    }

    pub async fn create_product(&self, mut product: NewProduct) -> Result<ProductView, CatalogApiError> {
        product.name = validate_name(&product.name)?.to_string();
        if product.price.is_negative() {
            return Err(CatalogApiError::InvalidArgument(format!("Price cannot be negative: {}", product.price)));
        }
        let product = self.db.insert_product(product).await?;
        info!("📚️ Product #{} '{}' created", product.id, product.name);
        self.with_category(product).await
    }

    pub async fn product(&self, id: i64) -> Result<ProductView, CatalogApiError> {
        let product = self.db.fetch_product(id).await?.ok_or(CatalogApiError::ProductNotFound(id))?;
        self.with_category(product).await
    }

    /// Enabled products only, optionally restricted to a single category.
    pub async fn products(
        &self,
        category_id: Option<i64>,
        page: Pagination,
    ) -> Result<Vec<ProductView>, CatalogApiError> {
        validate_page(&page)?;
        let products = self.db.fetch_enabled_products(category_id, page).await?;
        let mut categories = HashMap::<i64, Option<Category>>::new();
        let mut result = Vec::with_capacity(products.len());
        for product in products {
            let category = match categories.get(&product.category_id) {
                Some(c) => c.clone(),
                None => {
                    let c = self.db.fetch_category(product.category_id).await?;
                    categories.insert(product.category_id, c.clone());
                    c
                },
            };
            result.push(ProductView::new(product, category));
        }
        Ok(result)
    }

    pub async fn update_product(&self, id: i64, mut update: ProductUpdate) -> Result<ProductView, CatalogApiError> {
        if update.is_empty() {
            return Err(CatalogApiError::InvalidArgument("No fields to update".into()));
        }
        if let Some(name) = update.name.take() {
            update.name = Some(validate_name(&name)?.to_string());
        }
        if update.price.map(|p| p.is_negative()).unwrap_or(false) {
            return Err(CatalogApiError::InvalidArgument("Price cannot be negative".into()));
        }
        let product = self.db.update_product(id, update).await?.ok_or(CatalogApiError::ProductNotFound(id))?;
        if product.enabled {
            info!("📚️ Product #{id} updated");
        } else {
            warn!("📚️ Product #{id} was updated, but it is disabled");
        }
        self.with_category(product).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    async fn with_category(&self, product: Product) -> Result<ProductView, CatalogApiError> {
        let category = self.db.fetch_category(product.category_id).await?;
        Ok(ProductView::new(product, category))
    }
}

fn validate_name(name: &str) -> Result<&str, CatalogApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogApiError::InvalidArgument("Name cannot be empty".into()));
    }
    Ok(name)
}

fn validate_page(page: &Pagination) -> Result<(), CatalogApiError> {
    if page.is_valid() {
        Ok(())
    } else {
        Err(CatalogApiError::InvalidArgument(format!("Invalid page ({page})")))
    }
}
