use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use fos_common::Money;
use food_order_engine::{
    db_types::{Order, OrderId, OrderItem, OrderStatusType, PaymentStatus, Product, Tracking},
    traits::OrderFlowError,
    OrderFlowApi,
};
use payment_service_tools::{PaymentOutcome, PaymentResponse};
use serde_json::json;

use super::{
    helpers::{get_request, json, patch_request, post_request},
    mocks::{MockCatalogManager, MockGateway, MockOrderManager},
};
use crate::{
    errors::GENERIC_ERROR_MESSAGE,
    routes::{
        AddTrackingEventRoute,
        CreateOrderRoute,
        ListOrdersRoute,
        OrderByIdRoute,
        OrderTrackingRoute,
        UpdateOrderStatusRoute,
    },
};

type Api = OrderFlowApi<MockOrderManager, MockCatalogManager, MockGateway>;

#[actix_web::test]
async fn place_order() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product().times(1).returning(|id| Ok(Some(pastel(id))));
    let mut db = MockOrderManager::new();
    db.expect_insert_order()
        .withf(|o| o.customer_id == 7 && o.items.len() == 1 && o.items[0].unit_price == Money::from(750))
        .times(1)
        .returning(|_| Ok(order(PaymentStatus::Pending)));
    db.expect_fetch_order_items().returning(|_| Ok(vec![pastel_item()]));
    db.expect_record_payment_outcome()
        .withf(|id, status, payment| {
            *id == OrderId(1) &&
                *status == PaymentStatus::AwaitingPayment &&
                payment.map(|p| p.payment_id.as_str()) == Some("pay-1")
        })
        .times(1)
        .returning(|_, _, payment| Ok(paid_order(payment.cloned())));
    let mut gateway = MockGateway::new();
    gateway
        .expect_request_payment()
        .withf(|req| req.order_id == "1" && req.amount == Money::from(1500) && req.currency == "BRL")
        .times(1)
        .returning(|req| PaymentOutcome::Created(payment_response(req.amount)));

    let body = json!({"customer_id": 7, "order_items": [{"product_id": 3, "quantity": 2, "comment": " crispy "}]});
    let (status, body) = post_request("/orders", body, configure(db, catalog, gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = json(&body);
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "created");
    assert_eq!(order["payment_status"], "awaiting_payment");
    assert_eq!(order["amount"], 15.0);
    assert_eq!(order["payment_id"], "pay-1");
    assert_eq!(order["payment_link"], "https://pay.example.com/checkout/1");
    assert_eq!(order["items"][0]["name"], "Pastel");
    assert_eq!(order["items"][0]["price"], 7.5);
}

#[actix_web::test]
async fn place_order_while_payment_service_is_down() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product().returning(|id| Ok(Some(pastel(id))));
    let mut db = MockOrderManager::new();
    db.expect_insert_order().times(1).returning(|_| Ok(order(PaymentStatus::Pending)));
    db.expect_fetch_order_items().returning(|_| Ok(vec![pastel_item()]));
    db.expect_record_payment_outcome()
        .withf(|_, status, payment| *status == PaymentStatus::PaymentServiceUnavailable && payment.is_none())
        .times(1)
        .returning(|_, _, _| Ok(order(PaymentStatus::PaymentServiceUnavailable)));
    let mut gateway = MockGateway::new();
    gateway
        .expect_request_payment()
        .times(1)
        .returning(|_| PaymentOutcome::Unavailable { attempts: 3, last_error: "connection refused".into() });

    let body = json!({"customer_id": 7, "order_items": [{"product_id": 3, "quantity": 2}]});
    let (status, body) = post_request("/orders", body, configure(db, catalog, gateway)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = json(&body);
    assert_eq!(order["payment_status"], "payment_service_unavailable");
    assert_eq!(order["amount"], 15.0);
    assert!(order["payment_link"].is_null());
    assert!(order["qr_code"].is_null());
}

#[actix_web::test]
async fn invalid_orders_are_rejected() {
    let _ = env_logger::try_init().ok();
    // No expectations are set, so any storage or payment call fails the test
    let body = json!({"customer_id": 7, "order_items": []});
    let (status, _) = post_request("/orders", body, configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"customer_id": 7, "order_items": [{"product_id": 3, "quantity": 0}]});
    let (status, _) = post_request("/orders", body, configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"customer_id": "seven", "order_items": [{"product_id": 3}]});
    let (status, body) = post_request("/orders", body, configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#), "{body}");
}

#[actix_web::test]
async fn order_for_unknown_product() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product().returning(|_| Ok(None));
    let body = json!({"customer_id": 7, "order_items": [{"product_id": 99, "quantity": 1}]});
    let (status, body) = post_request("/orders", body, configure(MockOrderManager::new(), catalog, MockGateway::new()))
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Product 99 does not exist"}"#);
}

#[actix_web::test]
async fn fetch_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders/1", configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let order = json(&body);
    assert_eq!(order["id"], 1);
    assert_eq!(order["amount"], 15.0);

    let (status, body) = get_request("/orders/2", configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order 2 does not exist"}"#);

    let (status, _) = get_request("/orders/two", configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn order_id_query_returns_a_single_order_list() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders?order_id=1", configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders = json(&body);
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    assert_eq!(orders[0]["id"], 1);

    let (status, _) = get_request("/orders?order_id=2", configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_orders() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_search_orders()
        .withf(|q, p| {
            q.customer_id == Some(7) && q.status == Some(OrderStatusType::Paid) && p.skip == 5 && p.limit == 2
        })
        .times(1)
        .returning(|_, _| Ok(vec![order(PaymentStatus::Approved)]));
    db.expect_fetch_order_items().returning(|_| Ok(vec![pastel_item()]));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, body) =
        get_request("/orders?customer_id=7&status=paid&skip=5&limit=2", cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    let orders = json(&body);
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    assert_eq!(orders[0]["payment_status"], "approved");

    let (status, _) = get_request("/orders?status=lost", configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_request("/orders?limit=0", configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_status() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_fetch_order().returning(|_| Ok(Some(order(PaymentStatus::Pending))));
    db.expect_update_order()
        .withf(|id, u| *id == OrderId(1) && u.status == Some(OrderStatusType::Preparing) && u.payment_status.is_none())
        .times(1)
        .returning(|_, _| {
            let mut order = order(PaymentStatus::Pending);
            order.status = OrderStatusType::Preparing;
            Ok(Some(order))
        });
    db.expect_fetch_order_items().returning(|_| Ok(vec![pastel_item()]));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, body) =
        patch_request("/orders/1", json!({"status": "preparing"}), cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(json(&body)["status"], "preparing");
}

#[actix_web::test]
async fn invalid_status_updates() {
    let _ = env_logger::try_init().ok();
    for body in [
        json!({}),
        json!({"status": "lost"}),
        json!({"status": "created"}),
        json!({"payment_status": "awaiting_payment"}),
        json!({"status": "paid", "payment_status": "bounced"}),
    ] {
        let cfg = configure_order_lookup();
        let (status, res) = patch_request("/orders/1", body.clone(), cfg).await.expect("Request failed");
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {res}");
    }
    let mut db = MockOrderManager::new();
    db.expect_fetch_order().returning(|_| Ok(None));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, _) = patch_request("/orders/5", json!({"status": "paid"}), cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = patch_request("/orders/5", json!({}), configure_order_lookup()).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn tracking() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_fetch_order().returning(|_| Ok(Some(order(PaymentStatus::Pending))));
    db.expect_fetch_tracking().returning(|id| Ok(vec![make_tracking(1, id, "created"), make_tracking(2, id, "preparing")]));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, body) = get_request("/orders/1/tracking", cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let history = json(&body);
    assert_eq!(history[0]["status"], "created");
    assert_eq!(history[1]["status"], "preparing");

    let mut db = MockOrderManager::new();
    db.expect_insert_tracking()
        .withf(|id, label| *id == OrderId(1) && label == "left the kitchen")
        .times(1)
        .returning(|id, label| Ok(make_tracking(3, id, label)));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, body) = post_request("/orders/1/tracking", json!({"status": " left the kitchen "}), cfg)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(json(&body)["id"], 3);

    let (status, _) =
        post_request("/orders/1/tracking", json!({"status": "  "}), configure_empty()).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn storage_errors_are_not_leaked() {
    let _ = env_logger::try_init().ok();
    let mut db = MockOrderManager::new();
    db.expect_fetch_order()
        .returning(|_| Err(OrderFlowError::DatabaseError("no such table: orders (/var/lib/fos/orders.db)".into())));
    let cfg = configure(db, MockCatalogManager::new(), MockGateway::new());
    let (status, body) = get_request("/orders/1", cfg).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body)["error"], GENERIC_ERROR_MESSAGE);
}

fn configure(
    db: MockOrderManager,
    catalog: MockCatalogManager,
    gateway: MockGateway,
) -> impl FnOnce(&mut ServiceConfig) {
    let api: Api = OrderFlowApi::new(db, catalog, gateway);
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(CreateOrderRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new())
            .service(ListOrdersRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new())
            .service(OrderByIdRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new())
            .service(UpdateOrderStatusRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new())
            .service(OrderTrackingRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new())
            .service(AddTrackingEventRoute::<MockOrderManager, MockCatalogManager, MockGateway>::new());
    }
}

fn configure_empty() -> impl FnOnce(&mut ServiceConfig) {
    configure(MockOrderManager::new(), MockCatalogManager::new(), MockGateway::new())
}

/// Only order #1 exists
fn configure_order_lookup() -> impl FnOnce(&mut ServiceConfig) {
    let mut db = MockOrderManager::new();
    db.expect_fetch_order()
        .returning(|id| Ok((id == OrderId(1)).then(|| order(PaymentStatus::AwaitingPayment))));
    db.expect_fetch_order_items().returning(|_| Ok(vec![pastel_item()]));
    configure(db, MockCatalogManager::new(), MockGateway::new())
}

fn pastel(id: i64) -> Product {
    Product {
        id,
        name: "Pastel".into(),
        description: None,
        price: Money::from(750),
        category_id: 1,
        enabled: true,
    }
}

fn pastel_item() -> OrderItem {
    OrderItem {
        id: 1,
        order_id: OrderId(1),
        product_id: 3,
        quantity: 2,
        unit_price: Money::from(750),
        comment: Some("crispy".into()),
        product_name: Some("Pastel".into()),
    }
}

fn order(payment_status: PaymentStatus) -> Order {
    Order {
        id: OrderId(1),
        customer_id: 7,
        status: OrderStatusType::Created,
        payment_status,
        payment_id: None,
        payment_amount: None,
        qr_code: None,
        payment_link: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

fn paid_order(payment: Option<PaymentResponse>) -> Order {
    let mut order = order(PaymentStatus::AwaitingPayment);
    if let Some(p) = payment {
        order.payment_id = Some(p.payment_id);
        order.payment_amount = Some(p.amount);
        order.qr_code = p.qr_code;
        order.payment_link = p.payment_link;
    }
    order
}

fn payment_response(amount: Money) -> PaymentResponse {
    PaymentResponse {
        payment_id: "pay-1".into(),
        amount,
        qr_code: Some("00020126-QR".into()),
        payment_link: Some("https://pay.example.com/checkout/1".into()),
    }
}

fn make_tracking(id: i64, order_id: OrderId, status: &str) -> Tracking {
    Tracking { id, order_id, status: status.into(), created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 5, 0).unwrap() }
}
