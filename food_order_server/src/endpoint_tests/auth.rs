use std::sync::Arc;

use actix_web::{
    http::StatusCode,
    rt,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpRequest,
    HttpResponse,
    HttpServer,
};
use fos_common::Secret;
use food_order_engine::CatalogApi;
use futures::{future::LocalBoxFuture, FutureExt};
use serde_json::json;

use super::{
    helpers::{authorized, send_request, send_request_with_verifier},
    mocks::MockCatalogManager,
};
use crate::{
    auth::{Caller, HttpTokenVerifier, TokenVerifier},
    errors::{AuthError, GENERIC_ERROR_MESSAGE},
    routes::{health, ListCategoriesRoute},
};

/// Stands in for an auth service that cannot be reached.
struct UnreachableAuthService;

impl TokenVerifier for UnreachableAuthService {
    fn verify<'a>(&'a self, _: &'a Secret<String>) -> LocalBoxFuture<'a, Result<Caller, AuthError>> {
        futures::future::ready(Err(AuthError::ServiceUnavailable("connection refused".into()))).boxed_local()
    }
}

#[actix_web::test]
async fn health_does_not_need_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), |cfg| {
        cfg.service(health);
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"Operational"}"#);
}

#[actix_web::test]
async fn missing_or_bad_tokens_are_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/category"), configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. No bearer token was provided."}"#);

    let req = TestRequest::get().uri("/category").insert_header(("Authorization", "Bearer not-a-real-token"));
    let (status, body) = send_request(req, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("The access token is invalid or has expired"), "{body}");

    let req = TestRequest::get().uri("/category").insert_header(("Authorization", "Token abc"));
    let (status, _) = send_request(req, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn auth_service_outage_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let verifier = web::Data::from(Arc::new(UnreachableAuthService) as Arc<dyn TokenVerifier>);
    let req = authorized(TestRequest::get().uri("/category"));
    let (status, body) = send_request_with_verifier(req, verifier, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }).to_string());
}

async fn who_am_i(req: HttpRequest) -> HttpResponse {
    let token = req.headers().get("Authorization").and_then(|v| v.to_str().ok());
    match token {
        Some("Bearer good-token") => HttpResponse::Ok().json(json!({"id": 17, "email": "ana@example.com"})),
        Some("Bearer broken-token") => HttpResponse::BadGateway().finish(),
        _ => HttpResponse::Unauthorized().json(json!({"detail": "Could not validate credentials"})),
    }
}

/// Starts a mock auth service on a random port and returns its base URL.
fn start_auth_service() -> String {
    let server = HttpServer::new(|| App::new().route("/auth/me", web::get().to(who_am_i)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Could not bind mock auth service");
    let addr = server.addrs()[0];
    rt::spawn(server.run());
    format!("http://{addr}")
}

#[actix_web::test]
async fn http_token_verifier() {
    let _ = env_logger::try_init().ok();
    let url = start_auth_service();
    let verifier = HttpTokenVerifier::new(&format!("{url}/")).unwrap();

    let caller = verifier.verify(&Secret::new("good-token".to_string())).await.unwrap();
    assert_eq!(caller, Caller::new(17));
    let err = verifier.verify(&Secret::new("expired-token".to_string())).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)), "{err}");
    let err = verifier.verify(&Secret::new("broken-token".to_string())).await.unwrap_err();
    assert!(matches!(err, AuthError::ServiceUnavailable(_)), "{err}");

    // Nothing is listening here
    let verifier = HttpTokenVerifier::new("http://127.0.0.1:1").unwrap();
    let err = verifier.verify(&Secret::new("good-token".to_string())).await.unwrap_err();
    assert!(matches!(err, AuthError::ServiceUnavailable(_)), "{err}");
}

fn configure(cfg: &mut ServiceConfig) {
    // Requests are turned away before the catalog is touched
    let api = CatalogApi::new(MockCatalogManager::new());
    cfg.app_data(web::Data::new(api)).service(ListCategoriesRoute::<MockCatalogManager>::new());
}
