use std::{env, time::Duration};

use log::*;

use crate::RetryPolicy;

const DEFAULT_PAYMENT_SERVICE_URL: &str = "http://localhost:8002";

#[derive(Debug, Clone)]
pub struct PaymentServiceConfig {
    /// Base URL of the payment service, without a trailing slash. e.g. "http://payments.internal:8002"
    pub base_url: String,
    pub retry: RetryPolicy,
}

impl Default for PaymentServiceConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_PAYMENT_SERVICE_URL.to_string(), retry: RetryPolicy::default() }
    }
}

impl PaymentServiceConfig {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), retry }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = env::var("FOS_PAYMENT_SERVICE_URL").unwrap_or_else(|_| {
            warn!("🪛️ FOS_PAYMENT_SERVICE_URL not set, using {DEFAULT_PAYMENT_SERVICE_URL} as default");
            DEFAULT_PAYMENT_SERVICE_URL.to_string()
        });
        let defaults = RetryPolicy::default();
        let max_attempts = env_number("FOS_PAYMENT_MAX_ATTEMPTS", u64::from(defaults.max_attempts));
        let max_attempts = u32::try_from(max_attempts).unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            warn!("🪛️ FOS_PAYMENT_MAX_ATTEMPTS must be at least 1. Using 1.");
        }
        let timeout_ms = env_number("FOS_PAYMENT_TIMEOUT_MS", duration_ms(defaults.attempt_timeout));
        let backoff_ms = env_number("FOS_PAYMENT_BACKOFF_MS", duration_ms(defaults.backoff));
        let retry = RetryPolicy::new(max_attempts, Duration::from_millis(timeout_ms), Duration::from_millis(backoff_ms));
        info!("🪛️ Payment service at {base_url}. Retry policy: {retry:?}");
        Self::new(&base_url, retry)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn env_number(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(s) => s.trim().parse::<u64>().unwrap_or_else(|e| {
            warn!("🪛️ Invalid configuration value for {name} ({s}). {e}. Using the default, {default}.");
            default
        }),
        Err(_) => default,
    }
}
