use std::env;

use fos_common::env_flag;
use log::*;
use payment_service_tools::PaymentServiceConfig;

use crate::errors::ServerError;

const DEFAULT_FOS_HOST: &str = "127.0.0.1";
const DEFAULT_FOS_PORT: u16 = 8001;
const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Base URL of the service that validates bearer tokens, e.g. "http://auth.internal:8000"
    pub auth_service_url: String,
    pub payment: PaymentServiceConfig,
    /// If true, the starter catalog is loaded at start-up. Existing categories and products are left alone.
    pub seed_catalog: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FOS_HOST.to_string(),
            port: DEFAULT_FOS_PORT,
            database_url: String::default(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            payment: PaymentServiceConfig::default(),
            seed_catalog: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, database_url: &str) -> Self {
        Self { host: host.to_string(), port, database_url: database_url.to_string(), ..Default::default() }
    }

    /// Reads the configuration from the environment. Everything except `FOS_DATABASE_URL` has a default.
    pub fn from_env_or_default() -> Result<Self, ServerError> {
        let host = env::var("FOS_HOST").ok().unwrap_or_else(|| DEFAULT_FOS_HOST.into());
        let port = env::var("FOS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    warn!(
                        "🪛️ {s} is not a valid port for FOS_PORT. {e} Using the default, {DEFAULT_FOS_PORT}, instead."
                    );
                    DEFAULT_FOS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FOS_PORT);
        let database_url = env::var("FOS_DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ServerError::ConfigurationError("FOS_DATABASE_URL is not set".to_string()))?;
        let db_max_connections = env::var("FOS_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for FOS_DB_MAX_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let auth_service_url = env::var("FOS_AUTH_SERVICE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FOS_AUTH_SERVICE_URL is not set. Using {DEFAULT_AUTH_SERVICE_URL} as the default.");
            DEFAULT_AUTH_SERVICE_URL.to_string()
        });
        let auth_service_url = auth_service_url.trim_end_matches('/').to_string();
        let payment = PaymentServiceConfig::new_from_env_or_default();
        let seed_catalog = env_flag("FOS_SEED_CATALOG", false);
        if seed_catalog {
            info!("🪛️ The starter catalog will be loaded at start-up");
        }
        Ok(Self { host, port, database_url, db_max_connections, auth_service_url, payment, seed_catalog })
    }
}
