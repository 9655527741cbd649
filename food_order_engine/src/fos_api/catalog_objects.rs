use serde::{Deserialize, Serialize};

use crate::db_types::{Category, Product};

/// A product, along with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

impl ProductView {
    pub fn new(product: Product, category: Option<Category>) -> Self {
        Self { product, category }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}
