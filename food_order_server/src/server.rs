use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::Server,
    http::KeepAlive,
    middleware::{Logger, NormalizePath},
    web,
    App,
    HttpServer,
};
use food_order_engine::{seed::seed_catalog, CatalogApi, OrderFlowApi, SqliteDatabase};
use log::*;
use payment_service_tools::PaymentServiceApi;

use crate::{
    auth::{HttpTokenVerifier, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    helpers::configure_extractors,
    routes::{
        health,
        AddTrackingEventRoute,
        CategoryByIdRoute,
        CreateCategoryRoute,
        CreateOrderRoute,
        CreateProductRoute,
        ListCategoriesRoute,
        ListOrdersRoute,
        ListProductsRoute,
        OrderByIdRoute,
        OrderTrackingRoute,
        ProductByIdRoute,
        UpdateCategoryRoute,
        UpdateOrderStatusRoute,
        UpdateProductRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Database migration failed. {e}")))?;
    if config.seed_catalog {
        let summary = seed_catalog(&db).await?;
        info!(
            "🚀️ Starter catalog loaded. {} categories and {} products were added",
            summary.categories_created, summary.products_created
        );
    }
    let gateway = PaymentServiceApi::new(config.payment.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the payment service client. {e}")))?;
    info!("🚀️ Payment requests will be sent to {}", config.payment.base_url);
    let verifier = HttpTokenVerifier::new(&config.auth_service_url)?;
    info!("🚀️ Access tokens will be checked against {}", config.auth_service_url);
    let srv = create_server_instance(config, db, gateway, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<V>(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: PaymentServiceApi,
    verifier: V,
) -> Result<Server, ServerError>
where
    V: TokenVerifier + Clone + Send + 'static,
{
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), db.clone(), gateway.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let verifier = web::Data::from(Arc::new(verifier.clone()) as Arc<dyn TokenVerifier>);
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fos::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(verifier)
            .configure(configure_extractors)
            .service(health)
            .service(CreateOrderRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(ListOrdersRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(OrderByIdRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(OrderTrackingRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(AddTrackingEventRoute::<SqliteDatabase, SqliteDatabase, PaymentServiceApi>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(CreateCategoryRoute::<SqliteDatabase>::new())
            .service(ListCategoriesRoute::<SqliteDatabase>::new())
            .service(CategoryByIdRoute::<SqliteDatabase>::new())
            .service(UpdateCategoryRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
