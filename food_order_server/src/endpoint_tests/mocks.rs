use food_order_engine::{
    db_types::{
        Category,
        CategoryUpdate,
        NewOrder,
        NewProduct,
        Order,
        OrderId,
        OrderItem,
        OrderUpdate,
        PaymentStatus,
        Product,
        ProductUpdate,
        Tracking,
    },
    order_objects::{OrderQueryFilter, Pagination},
    traits::{CatalogApiError, CatalogManagement, OrderFlowError, OrderManagement, PaymentGateway},
};
use mockall::mock;
use payment_service_tools::{PaymentOutcome, PaymentRequest, PaymentResponse};

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError>;
        async fn fetch_order(&self, id: OrderId) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, OrderFlowError>;
        async fn search_orders(&self, query: OrderQueryFilter, page: Pagination) -> Result<Vec<Order>, OrderFlowError>;
        async fn update_order(&self, id: OrderId, update: OrderUpdate) -> Result<Option<Order>, OrderFlowError>;
        async fn record_payment_outcome<'a>(&self, id: OrderId, payment_status: PaymentStatus, payment: Option<&'a PaymentResponse>) -> Result<Order, OrderFlowError>;
        async fn insert_tracking(&self, id: OrderId, label: &str) -> Result<Tracking, OrderFlowError>;
        async fn fetch_tracking(&self, id: OrderId) -> Result<Vec<Tracking>, OrderFlowError>;
        async fn delete_order(&self, id: OrderId) -> Result<bool, OrderFlowError>;
    }
}

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn insert_category(&self, name: &str) -> Result<Category, CatalogApiError>;
        async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;
        async fn fetch_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogApiError>;
        async fn fetch_enabled_categories(&self, page: Pagination) -> Result<Vec<Category>, CatalogApiError>;
        async fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Option<Category>, CatalogApiError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_enabled_products(&self, category_id: Option<i64>, page: Pagination) -> Result<Vec<Product>, CatalogApiError>;
        async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, CatalogApiError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn request_payment(&self, request: &PaymentRequest) -> PaymentOutcome;
    }
}
