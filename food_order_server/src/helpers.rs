use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web,
    HttpRequest,
};
use log::debug;

use crate::errors::ServerError;

/// Malformed JSON bodies are reported as `400` with the usual `{"error": ...}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        debug!("💻️ Invalid JSON body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req: &HttpRequest| {
        debug!("💻️ Invalid query string for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        debug!("💻️ Invalid path {}. {err}", req.path());
        ServerError::InvalidRequestPath(err.to_string()).into()
    })
}

/// Registers the extractor configurations on an app or scope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(query_config()).app_data(path_config());
}
