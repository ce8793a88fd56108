use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::appointment::Appointment;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkout {
    /// Opaque reference of the payment processor, stored on the appointment.
    pub checkout_handle: Arc<str>,
    pub redirect_url: Arc<str>,
}

#[automock]
#[async_trait]
pub trait PaymentGatewayService {
    async fn create_checkout(&self, appointment: &Appointment) -> Result<Checkout, ServiceError>;
}
