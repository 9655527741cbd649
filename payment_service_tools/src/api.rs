use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
};

use crate::{
    retry::retry_with_backoff,
    PaymentOutcome,
    PaymentRequest,
    PaymentResponse,
    PaymentServiceConfig,
    PaymentServiceError,
};

#[derive(Clone)]
pub struct PaymentServiceApi {
    config: PaymentServiceConfig,
    client: Arc<Client>,
}

impl PaymentServiceApi {
    pub fn new(config: PaymentServiceConfig) -> Result<Self, PaymentServiceError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PaymentServiceError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &PaymentServiceConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Makes exactly one call to the payment service.
    ///
    /// The call is bounded by the retry policy's per-attempt timeout. A non-2xx status, or a body that is not a
    /// valid [`PaymentResponse`], is an error.
    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse, PaymentServiceError> {
        let url = self.url("/payments/");
        trace!("💳️ Sending payment request for order {} to {url}", request.order_id);
        let response =
            self.client.post(url).timeout(self.config.retry.attempt_timeout).json(request).send().await?;
        if response.status().is_success() {
            trace!("💳️ Payment request successful. {}", response.status());
            let text = response.text().await?;
            serde_json::from_str::<PaymentResponse>(&text).map_err(|e| PaymentServiceError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(PaymentServiceError::QueryError { status, message })
        }
    }

    /// Requests a payment for the order, retrying according to the configured [`crate::RetryPolicy`].
    ///
    /// Never performs more than `max_attempts` outbound calls. If every attempt fails, the outcome is
    /// [`PaymentOutcome::Unavailable`].
    pub async fn request_payment(&self, request: &PaymentRequest) -> PaymentOutcome {
        let label = format!("Payment request for order {}", request.order_id);
        match retry_with_backoff(&self.config.retry, &label, |_| self.create_payment(request)).await {
            Ok(response) => {
                info!("💳️ Payment {} created for order {} ({})", response.payment_id, request.order_id, response.amount);
                PaymentOutcome::Created(response)
            },
            Err(PaymentServiceError::RetriesExhausted { attempts, last_error }) => {
                warn!("💳️ Payment service unavailable for order {} after {attempts} attempts", request.order_id);
                PaymentOutcome::Unavailable { attempts, last_error }
            },
            Err(e) => {
                warn!("💳️ Payment service unavailable for order {}. {e}", request.order_id);
                PaymentOutcome::Unavailable { attempts: self.config.retry.max_attempts, last_error: e.to_string() }
            },
        }
    }
}
