use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use food_order_engine::{CatalogApiError, OrderFlowError};
use log::error;
use thiserror::Error;

/// Returned in place of the real cause for every 5xx response. The cause is logged instead.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid request. {0}")]
    InvalidArgument(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::ServiceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("💻️ Request failed with {status}. {self}");
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer token was provided.")]
    MissingToken,
    #[error("The Authorization header is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("The access token is invalid or has expired. {0}")]
    InvalidToken(String),
    #[error("The auth service could not be reached. {0}")]
    ServiceUnavailable(String),
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::OrderNotFound(_) | OrderFlowError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            OrderFlowError::DatabaseError(msg) => Self::BackendError(format!("Database error: {msg}")),
            OrderFlowError::CatalogError(e) => e.into(),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::CategoryNotFound(_) | CatalogApiError::ProductNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            CatalogApiError::DuplicateCategory(_) => Self::InvalidArgument(e.to_string()),
            CatalogApiError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            CatalogApiError::DatabaseError(msg) => Self::BackendError(format!("Database error: {msg}")),
        }
    }
}
