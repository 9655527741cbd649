use std::{future::Future, time::Duration};

use log::*;
use tokio::time::sleep;

use crate::PaymentServiceError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Bounds on how hard the client tries before giving up on the payment service.
///
/// The worst-case latency of a call is `max_attempts * attempt_timeout + (max_attempts - 1) * backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT, backoff: DEFAULT_BACKOFF }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, attempt_timeout: Duration, backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), attempt_timeout, backoff }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Calls `attempt` until it succeeds, or `policy.max_attempts` calls have failed.
///
/// `attempt` receives the 1-based attempt number. A fixed `policy.backoff` pause separates consecutive attempts; there
/// is no pause after the final one. Every failure is logged. When all attempts fail,
/// [`PaymentServiceError::RetriesExhausted`] carries the last error.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut attempt: F,
) -> Result<T, PaymentServiceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, PaymentServiceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::default();
    for n in 1..=max_attempts {
        match attempt(n).await {
            Ok(result) => {
                trace!("💳️ {label} succeeded on attempt {n}/{max_attempts}");
                return Ok(result);
            },
            Err(e) => {
                error!("💳️ {label} failed [attempt {n}/{max_attempts}]: {e}");
                last_error = e.to_string();
            },
        }
        if n < max_attempts {
            sleep(policy.backoff).await;
        }
    }
    Err(PaymentServiceError::RetriesExhausted { attempts: max_attempts, last_error })
}
