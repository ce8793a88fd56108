use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::appointment::{Appointment, PaymentMethod};
use crate::client::ClientIdentity;
use crate::payment_gateway::Checkout;
use crate::ServiceError;

/// Appointments may only start on this minute grid, whatever discovery
/// granularity the business configures.
pub const BOOKING_GRID_MINUTES: u8 = 30;

pub fn is_on_booking_grid(start_time: PrimitiveDateTime) -> bool {
    start_time.minute() % BOOKING_GRID_MINUTES == 0
        && start_time.second() == 0
        && start_time.nanosecond() == 0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    pub business_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub offering_id: Uuid,
    /// Auto assigned when missing.
    pub professional_id: Option<Uuid>,
    pub client: ClientIdentity,
    /// Branch local time.
    pub start_time: PrimitiveDateTime,
    pub notes: Option<Arc<str>>,
    pub payment_method: PaymentMethod,
    /// Books despite a prepayment recommendation of the scoring.
    pub acknowledge_payment_risk: bool,
}

/// Fields of an appointment which may change after creation. `None` keeps
/// the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub start_time: Option<PrimitiveDateTime>,
    pub offering_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub notes: Option<Arc<str>>,
}

impl AppointmentPatch {
    pub fn changes_schedule(&self) -> bool {
        self.start_time.is_some() || self.offering_id.is_some() || self.professional_id.is_some()
    }
}

/// Non fatal problems which occurred while booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingWarning {
    /// The payment gate did not answer; the booking went ahead without prepayment.
    PaymentValidationUnavailable(Arc<str>),
    /// The notification could not be queued.
    NotificationNotPublished(Arc<str>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    pub checkout: Option<Checkout>,
    pub warnings: Arc<[BookingWarning]>,
}

/// Writes appointments. Every operation is its own unit of work.
#[automock]
#[async_trait]
pub trait BookingService {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError>;

    async fn create(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<BookingOutcome, ServiceError>;

    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        patch: &AppointmentPatch,
    ) -> Result<BookingOutcome, ServiceError>;

    /// Cancelling an already cancelled appointment succeeds without changes.
    async fn cancel(
        &self,
        business_id: Uuid,
        id: Uuid,
        reason: Option<Arc<str>>,
    ) -> Result<BookingOutcome, ServiceError>;

    async fn confirm_payment(
        &self,
        business_id: Uuid,
        id: Uuid,
    ) -> Result<Appointment, ServiceError>;

    async fn fail_payment(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError>;

    /// Only once the appointment ended in branch local time.
    async fn complete(&self, business_id: Uuid, id: Uuid) -> Result<Appointment, ServiceError>;

    /// Only once the appointment ended in branch local time.
    async fn mark_no_show(&self, business_id: Uuid, id: Uuid)
        -> Result<Appointment, ServiceError>;

    /// Cancels pending payments created more than `max_age` ago.
    async fn expire_pending_payments(
        &self,
        max_age: time::Duration,
    ) -> Result<Arc<[Appointment]>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_booking_grid() {
        assert!(is_on_booking_grid(datetime!(2024-01-15 10:00)));
        assert!(is_on_booking_grid(datetime!(2024-01-15 10:30)));
        assert!(!is_on_booking_grid(datetime!(2024-01-15 10:15)));
        assert!(!is_on_booking_grid(datetime!(2024-01-15 10:45)));
        assert!(!is_on_booking_grid(datetime!(2024-01-15 10:30:01)));
    }
}
