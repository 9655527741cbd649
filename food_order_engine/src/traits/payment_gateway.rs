use payment_service_tools::{PaymentOutcome, PaymentRequest, PaymentServiceApi};

/// Something that can issue a payment link for an order.
///
/// Implementations own their retry policy. Failing to reach the payment service is reported as
/// [`PaymentOutcome::Unavailable`], never as an error.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn request_payment(&self, request: &PaymentRequest) -> PaymentOutcome;
}

impl PaymentGateway for PaymentServiceApi {
    async fn request_payment(&self, request: &PaymentRequest) -> PaymentOutcome {
        PaymentServiceApi::request_payment(self, request).await
    }
}
