use std::sync::Arc;

use crate::gen_service_impl;
use async_trait::async_trait;
use service::{
    appointment::Appointment,
    config::ConfigService,
    payment_gateway::{Checkout, PaymentGatewayService},
    payment_validation::{PaymentDecision, PaymentValidationService, ScoringSummary},
    uuid_service::UuidService,
    ServiceError,
};
use tracing::info;
use uuid::Uuid;

/// Payment gate for deployments without a scoring collaborator.
pub struct NoPrepaymentValidationServiceImpl;

#[async_trait]
impl PaymentValidationService for NoPrepaymentValidationServiceImpl {
    async fn evaluate(
        &self,
        _business_id: Uuid,
        _email: Option<Arc<str>>,
        _phone: Option<Arc<str>>,
    ) -> Result<PaymentDecision, ServiceError> {
        Ok(PaymentDecision {
            requires_online_payment: false,
            scoring: ScoringSummary {
                score: 100,
                no_show_count: 0,
                reason: "no scoring configured".into(),
            },
        })
    }
}

gen_service_impl! {
    struct PaymentGatewayServiceImpl: PaymentGatewayService = PaymentGatewayServiceDeps {
        ConfigService: ConfigService = config_service,
        UuidService: UuidService = uuid_service,
    }
}

#[async_trait]
impl<Deps: PaymentGatewayServiceDeps> PaymentGatewayService for PaymentGatewayServiceImpl<Deps> {
    async fn create_checkout(&self, appointment: &Appointment) -> Result<Checkout, ServiceError> {
        let config = self.config_service.get_config().await?;
        let base_url = config.payment_checkout_base_url.ok_or_else(|| {
            ServiceError::CollaboratorError(
                "payment-gateway",
                "no checkout base url configured".into(),
            )
        })?;
        let checkout_handle: Arc<str> = self
            .uuid_service
            .new_uuid("checkout-handle")
            .to_string()
            .into();
        info!(
            "Created checkout {} for appointment {}",
            checkout_handle, appointment.id
        );
        Ok(Checkout {
            redirect_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                checkout_handle
            )
            .into(),
            checkout_handle,
        })
    }
}
