#![allow(dead_code)]
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use fos_common::Money;
use food_order_engine::{
    db_types::{Category, NewProduct, Product},
    CatalogApi,
    OrderFlowApi,
    PaymentGateway,
    SqliteDatabase,
};
use log::*;
use payment_service_tools::{PaymentOutcome, PaymentRequest, PaymentResponse};


use prepare_env::{prepare_test_env, random_db_path};

pub async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    if let Err(e) = prepare_env::drop_database(&url).await {
        error!("🚀️ Failed to drop test database: {e}");
    }
}

pub fn order_api(db: &SqliteDatabase, gateway: &FakeGateway) -> OrderFlowApi<SqliteDatabase, SqliteDatabase, FakeGateway> {
    OrderFlowApi::new(db.clone(), db.clone(), gateway.clone())
}

/// A small menu: Drinks (Cola R$5.00, Juice R$6.50) and Snacks (Pastel R$7.50).
pub struct Menu {
    pub drinks: Category,
    pub snacks: Category,
    pub cola: Product,
    pub juice: Product,
    pub pastel: Product,
}

pub async fn create_menu(db: &SqliteDatabase) -> Menu {
    let api = CatalogApi::new(db.clone());
    let drinks = api.create_category("Drinks").await.unwrap();
    let snacks = api.create_category("Snacks").await.unwrap();
    let cola = api.create_product(NewProduct::new("Cola", Money::from(500), drinks.id)).await.unwrap().product;
    let juice = api.create_product(NewProduct::new("Juice", Money::from(650), drinks.id)).await.unwrap().product;
    let pastel = api
        .create_product(NewProduct::new("Pastel", Money::from(750), snacks.id).with_description("Cheese pastel"))
        .await
        .unwrap()
        .product;
    Menu { drinks, snacks, cola, juice, pastel }
}

/// Stands in for the payment service. Counts every request it receives.
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    calls: Arc<AtomicU32>,
    offline: bool,
    quote: Option<Money>,
}

impl FakeGateway {
    pub fn online() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    /// Responds with `amount` instead of echoing the requested amount.
    pub fn quoting(amount: Money) -> Self {
        Self { quote: Some(amount), ..Self::default() }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for FakeGateway {
    async fn request_payment(&self, request: &PaymentRequest) -> PaymentOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!("💳️ Fake payment request: {request:?}");
        if self.offline {
            return PaymentOutcome::Unavailable { attempts: 3, last_error: "Connection refused".into() };
        }
        PaymentOutcome::Created(PaymentResponse {
            payment_id: format!("pay-{}", request.order_id),
            amount: self.quote.unwrap_or(request.amount),
            qr_code: Some(format!("qr-{}", request.order_id)),
            payment_link: Some(format!("https://pay.example.com/checkout/{}", request.order_id)),
        })
    }
}
