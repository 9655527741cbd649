//! Requests against a real SQLite store, with the payment service switched off.
use std::time::Duration;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use food_order_engine::{
    seed::seed_catalog,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};
use payment_service_tools::{PaymentServiceApi, PaymentServiceConfig, RetryPolicy};
use serde_json::json;

use super::helpers::{get_request, json, patch_request, post_request};
use crate::routes::{
    CreateOrderRoute,
    ListOrdersRoute,
    ListProductsRoute,
    OrderByIdRoute,
    OrderTrackingRoute,
    UpdateOrderStatusRoute,
};

#[actix_web::test]
async fn order_lifecycle_with_payment_service_down() {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Could not connect to test database");
    seed_catalog(&db).await.expect("Could not seed the catalog");
    // Nothing listens on port 1, so every payment attempt fails fast
    let policy = RetryPolicy::new(1, Duration::from_millis(200), Duration::from_millis(10));
    let gateway = PaymentServiceApi::new(PaymentServiceConfig::new("http://127.0.0.1:1", policy)).unwrap();

    let (status, body) = get_request("/products?limit=100", configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    let products = json(&body);
    let products = products.as_array().expect("Expected a list of products");
    assert_eq!(products.len(), 15);
    let burger = products.iter().find(|p| p["name"] == "Classic Cheeseburger").expect("Burger is missing");
    assert_eq!(burger["price"], 12.0);
    let burger_id = burger["id"].as_i64().unwrap();

    let item = json!({"product_id": burger_id, "quantity": 2, "comment": "no pickles"});
    let body = json!({"customer_id": 5, "order_items": [item]});
    let (status, body) = post_request("/orders", body, configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = json(&body);
    assert_eq!(order["status"], "created");
    assert_eq!(order["payment_status"], "payment_service_unavailable");
    assert_eq!(order["amount"], 24.0);
    let id = order["id"].as_i64().unwrap();

    let path = format!("/orders/{id}");
    let (status, body) =
        patch_request(&path, json!({"status": "preparing"}), configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(json(&body)["status"], "preparing");

    let (status, body) = get_request(&path, configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order = json(&body);
    assert_eq!(order["amount"], 24.0);
    assert_eq!(order["items"][0]["comment"], "no pickles");

    let (status, body) =
        get_request(&format!("/orders/{id}/tracking"), configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let labels = json(&body).as_array().unwrap().iter().map(|t| t["status"].clone()).collect::<Vec<_>>();
    assert_eq!(labels, vec![json!("created"), json!("preparing")]);

    let cfg = configure(&db, &gateway);
    let (status, body) = get_request("/orders?customer_id=5&status=preparing", cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body).as_array().map(Vec::len), Some(1));
    let (status, body) = get_request("/orders?customer_id=6", configure(&db, &gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let mut db = db;
    db.close().await;
}

fn configure(db: &SqliteDatabase, gateway: &PaymentServiceApi) -> impl FnOnce(&mut ServiceConfig) {
    let orders_api = OrderFlowApi::new(db.clone(), db.clone(), gateway.clone());
    let catalog_api = CatalogApi::new(db.clone());
    move |cfg| {
        cfg.app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(catalog_api))
            .service(CreateOrderRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(ListOrdersRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(OrderByIdRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(OrderTrackingRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new());
    }
}
