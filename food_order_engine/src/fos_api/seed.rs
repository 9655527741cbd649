//! The starter catalog that a fresh deployment is loaded with.
//!
//! Seeding is idempotent. Categories and products are matched by name, and anything that already exists is left
//! untouched, so running the seed against a live catalog never changes prices or enabled flags.
use fos_common::Money;
use log::*;

use crate::{
    db_types::NewProduct,
    traits::{CatalogApiError, CatalogManagement},
};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
}

const fn item(name: &'static str, description: &'static str, price: i64) -> SeedProduct {
    SeedProduct { name, description, price }
}

/// (category, products). Prices are in whole reais.
const SEED_CATALOG: [(&str, [SeedProduct; 3]); 5] = [
    ("Sandwiches", [
        item("Grilled Chicken Sandwich", "Grilled chicken sandwich with lettuce and tomato", 15),
        item("Classic Cheeseburger", "Classic cheeseburger with beef patty and cheese", 12),
        item("Vegan Chickpea Sandwich", "Vegan sandwich with chickpea patty", 14),
    ]),
    ("Pizzas", [
        item("Margherita Pizza", "Pizza with tomato sauce, mozzarella, and basil", 25),
        item("Pepperoni Pizza", "Pizza with tomato sauce, mozzarella, and pepperoni", 27),
        item("Four Cheese Pizza", "Pizza with four types of cheese", 28),
    ]),
    ("Sides", [
        item("French Fries", "Portion of crispy french fries", 8),
        item("Onion Rings", "Portion of breaded onion rings", 9),
        item("Caesar Salad", "Caesar salad with lettuce, croutons, and parmesan cheese", 10),
    ]),
    ("Drinks", [
        item("Cola", "Cola soft drink", 5),
        item("Orange Juice", "Natural orange juice", 6),
        item("Mineral Water", "Still mineral water", 4),
    ]),
    ("Desserts", [
        item("Chocolate Brownie", "Chocolate brownie with walnuts", 7),
        item("Apple Pie", "Apple pie with cinnamon", 8),
        item("Vanilla Ice Cream", "Vanilla ice cream", 6),
    ]),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub products_created: usize,
}

/// Loads the starter catalog, creating whatever is missing.
pub async fn seed_catalog<B: CatalogManagement>(db: &B) -> Result<SeedSummary, CatalogApiError> {
    let mut summary = SeedSummary::default();
    for (category_name, products) in &SEED_CATALOG {
        let category = match db.fetch_category_by_name(category_name).await? {
            Some(c) => c,
            None => {
                summary.categories_created += 1;
                db.insert_category(category_name).await?
            },
        };
        for p in products {
            if db.fetch_product_by_name(p.name).await?.is_some() {
                trace!("📚️ Product '{}' already exists", p.name);
                continue;
            }
            let product =
                NewProduct::new(p.name, Money::from_major(p.price), category.id).with_description(p.description);
            db.insert_product(product).await?;
            summary.products_created += 1;
        }
    }
    info!(
        "📚️ Catalog seeded. {} categories and {} products were added",
        summary.categories_created, summary.products_created
    );
    Ok(summary)
}
