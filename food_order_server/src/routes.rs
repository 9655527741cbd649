//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (I/O, database operations, the
//! payment service round trip) must be expressed as futures or asynchronous functions.
//!
//! Every handler except `health` takes a [`Caller`], so the request is authenticated before the handler body runs.
use actix_web::{get, rt, web, HttpResponse, Responder};
use food_order_engine::{
    catalog_objects::NewCategoryRequest,
    db_types::{CategoryUpdate, NewProduct, OrderId, ProductUpdate},
    order_objects::{NewOrderRequest, StatusUpdateRequest},
    traits::{CatalogManagement, OrderManagement, PaymentGateway},
    CatalogApi,
    OrderFlowApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::Caller,
    data_objects::{CategoryListParams, OrderListParams, ProductListParams, TrackingEventRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({ "status": "Operational" }))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement, CatalogManagement, PaymentGateway);
/// Route handler for placing a new order.
///
/// The order is stored and a payment link requested from the payment service. The payment request (including its
/// retries) runs on its own task, so the order is completed even if the client goes away before the response is
/// sent. An unreachable payment service does not fail the request: the order comes back with
/// `payment_status = "payment_service_unavailable"` and no payment details.
pub async fn create_order<B, C, G>(
    caller: Caller,
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + 'static,
    C: CatalogManagement + 'static,
    G: PaymentGateway + 'static,
{
    let request = body.into_inner();
    info!(
        "💻️ Caller {} is placing an order for customer {} with {} items",
        caller.id,
        request.customer_id,
        request.order_items.len()
    );
    let api = api.into_inner();
    let task = rt::spawn(async move { api.create_order(request).await });
    let order = task.await.map_err(|e| ServerError::Unspecified(format!("The order task did not complete. {e}")))??;
    info!("💻️ Order #{} created. Payment status: {}", order.id, order.payment_status);
    Ok(HttpResponse::Ok().json(order))
}

route!(list_orders => Get "/orders" impl OrderManagement, CatalogManagement, PaymentGateway);
/// Route handler for searching orders.
///
/// Supports `customer_id`, `status`, `skip` and `limit` query parameters. The filters are applied before the page is
/// taken. If `order_id` is given, the result is a list holding just that order, or a 404 if there is no such order.
pub async fn list_orders<B, C, G>(
    caller: Caller,
    query: web::Query<OrderListParams>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    let params = query.into_inner();
    debug!("💻️ GET orders for caller {}. {params:?}", caller.id);
    if let Some(id) = params.order_id {
        let order = api.get_order(id).await?;
        return Ok(HttpResponse::Ok().json(vec![order]));
    }
    let orders = api.list_orders(params.filter()?, params.page()).await?;
    debug!("💻️ Returning {} orders", orders.len());
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement, CatalogManagement, PaymentGateway);
pub async fn order_by_id<B, C, G>(
    caller: Caller,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    let id = path.into_inner();
    debug!("💻️ GET order #{id} for caller {}", caller.id);
    let order = api.get_order(id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Patch "/orders/{order_id}" impl OrderManagement, CatalogManagement, PaymentGateway);
/// Route handler for manual status changes.
///
/// The body holds `status` and/or `payment_status`. Unknown values, `created`, and the payment states that only the
/// system may set are rejected with a 400.
pub async fn update_order_status<B, C, G>(
    caller: Caller,
    path: web::Path<OrderId>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    let id = path.into_inner();
    let update = body.into_inner();
    info!("💻️ Caller {} is updating order #{id}. {update:?}", caller.id);
    let order = api.update_order_status(id, update).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_tracking => Get "/orders/{order_id}/tracking" impl OrderManagement, CatalogManagement, PaymentGateway);
pub async fn order_tracking<B, C, G>(
    caller: Caller,
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    let id = path.into_inner();
    debug!("💻️ GET tracking for order #{id} for caller {}", caller.id);
    let history = api.tracking_for_order(id).await?;
    Ok(HttpResponse::Ok().json(history))
}

route!(add_tracking_event => Post "/orders/{order_id}/tracking" impl OrderManagement, CatalogManagement, PaymentGateway);
pub async fn add_tracking_event<B, C, G>(
    caller: Caller,
    path: web::Path<OrderId>,
    body: web::Json<TrackingEventRequest>,
    api: web::Data<OrderFlowApi<B, C, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
    C: CatalogManagement,
    G: PaymentGateway,
{
    let id = path.into_inner();
    debug!("💻️ Caller {} is adding a tracking event to order #{id}", caller.id);
    let entry = api.add_tracking_event(id, &body.status).await?;
    Ok(HttpResponse::Ok().json(entry))
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(create_product => Post "/products" impl CatalogManagement);
pub async fn create_product<B: CatalogManagement>(
    caller: Caller,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = body.into_inner();
    info!("💻️ Caller {} is creating product '{}'", caller.id, product.name);
    let product = api.create_product(product).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(list_products => Get "/products" impl CatalogManagement);
/// Enabled products, optionally narrowed to a `category_id`. With `product_id`, a list holding just that product (or
/// a 404).
pub async fn list_products<B: CatalogManagement>(
    caller: Caller,
    query: web::Query<ProductListParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = query.into_inner();
    debug!("💻️ GET products for caller {}. {params:?}", caller.id);
    if let Some(id) = params.product_id {
        let product = api.product(id).await?;
        return Ok(HttpResponse::Ok().json(vec![product]));
    }
    let products = api.products(params.category_id, params.page()).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{product_id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    caller: Caller,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET product #{id} for caller {}", caller.id);
    let product = api.product(id).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product => Patch "/products/{product_id}" impl CatalogManagement);
pub async fn update_product<B: CatalogManagement>(
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    info!("💻️ Caller {} is editing product #{id}", caller.id);
    let product = api.update_product(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Categories  ----------------------------------------------------
route!(create_category => Post "/category" impl CatalogManagement);
pub async fn create_category<B: CatalogManagement>(
    caller: Caller,
    body: web::Json<NewCategoryRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    info!("💻️ Caller {} is creating category '{}'", caller.id, body.name);
    let category = api.create_category(&body.name).await?;
    Ok(HttpResponse::Ok().json(category))
}

route!(list_categories => Get "/category" impl CatalogManagement);
pub async fn list_categories<B: CatalogManagement>(
    caller: Caller,
    query: web::Query<CategoryListParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = query.into_inner();
    debug!("💻️ GET categories for caller {}. {params:?}", caller.id);
    if let Some(id) = params.category_id {
        let category = api.category(id).await?;
        return Ok(HttpResponse::Ok().json(vec![category]));
    }
    let categories = api.categories(params.page()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(category_by_id => Get "/category/{category_id}" impl CatalogManagement);
pub async fn category_by_id<B: CatalogManagement>(
    caller: Caller,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET category #{id} for caller {}", caller.id);
    let category = api.category(id).await?;
    Ok(HttpResponse::Ok().json(category))
}

route!(update_category => Patch "/category/{category_id}" impl CatalogManagement);
pub async fn update_category<B: CatalogManagement>(
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<CategoryUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    info!("💻️ Caller {} is editing category #{id}", caller.id);
    let category = api.update_category(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}
