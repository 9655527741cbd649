use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PaymentServiceError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the payment service: {0}")]
    TransportError(String),
    #[error("The payment service did not answer in time: {0}")]
    Timeout(String),
    #[error("Payment request failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Gave up after {attempts} attempts. Last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl From<reqwest::Error> for PaymentServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::JsonError(e.to_string())
        } else {
            Self::TransportError(e.to_string())
        }
    }
}
