use std::fmt::{Display, Formatter};
use std::sync::Arc;

use agendo_utils::TimeRange;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

/// Lifecycle of an appointment.
///
/// ```text
/// PENDING_PAYMENT -> CONFIRMED | CANCELLED
/// CONFIRMED       -> CANCELLED | COMPLETED | NO_SHOW
/// ```
/// `CANCELLED`, `COMPLETED` and `NO_SHOW` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    PendingPayment,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    /// Active appointments block their time range for the professional.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::PendingPayment | AppointmentStatus::Confirmed
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (PendingPayment, Confirmed)
                | (PendingPayment, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, NoShow)
        )
    }

    pub fn transition_to(&self, next: AppointmentStatus) -> Result<Self, ServiceError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ServiceError::InvalidStatusTransition(*self, next))
        }
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(dao::appointment::AppointmentStatus::from(*self).as_str())
    }
}

impl From<dao::appointment::AppointmentStatus> for AppointmentStatus {
    fn from(status: dao::appointment::AppointmentStatus) -> Self {
        match status {
            dao::appointment::AppointmentStatus::PendingPayment => Self::PendingPayment,
            dao::appointment::AppointmentStatus::Confirmed => Self::Confirmed,
            dao::appointment::AppointmentStatus::Cancelled => Self::Cancelled,
            dao::appointment::AppointmentStatus::Completed => Self::Completed,
            dao::appointment::AppointmentStatus::NoShow => Self::NoShow,
        }
    }
}
impl From<AppointmentStatus> for dao::appointment::AppointmentStatus {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::PendingPayment => Self::PendingPayment,
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::Cancelled => Self::Cancelled,
            AppointmentStatus::Completed => Self::Completed,
            AppointmentStatus::NoShow => Self::NoShow,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Local,
    Online,
}

impl From<dao::appointment::PaymentMethod> for PaymentMethod {
    fn from(payment_method: dao::appointment::PaymentMethod) -> Self {
        match payment_method {
            dao::appointment::PaymentMethod::Local => Self::Local,
            dao::appointment::PaymentMethod::Online => Self::Online,
        }
    }
}
impl From<PaymentMethod> for dao::appointment::PaymentMethod {
    fn from(payment_method: PaymentMethod) -> Self {
        match payment_method {
            PaymentMethod::Local => Self::Local,
            PaymentMethod::Online => Self::Online,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub offering_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    pub price_cents: i64,
    pub notes: Option<Arc<str>>,
    pub checkout_handle: Option<Arc<str>>,
    pub cancellation_reason: Option<Arc<str>>,
    pub created: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl Appointment {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

impl From<&dao::appointment::AppointmentEntity> for Appointment {
    fn from(appointment: &dao::appointment::AppointmentEntity) -> Self {
        Self {
            id: appointment.id,
            business_id: appointment.business_id,
            branch_id: appointment.branch_id,
            client_id: appointment.client_id,
            offering_id: appointment.offering_id,
            professional_id: appointment.professional_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.into(),
            payment_method: appointment.payment_method.into(),
            price_cents: appointment.price_cents,
            notes: appointment.notes.clone(),
            checkout_handle: appointment.checkout_handle.clone(),
            cancellation_reason: appointment.cancellation_reason.clone(),
            created: Some(appointment.created),
            version: appointment.version,
        }
    }
}

impl TryFrom<&Appointment> for dao::appointment::AppointmentEntity {
    type Error = ServiceError;
    fn try_from(appointment: &Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id,
            business_id: appointment.business_id,
            branch_id: appointment.branch_id,
            client_id: appointment.client_id,
            offering_id: appointment.offering_id,
            professional_id: appointment.professional_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.into(),
            payment_method: appointment.payment_method.into(),
            price_cents: appointment.price_cents,
            notes: appointment.notes.clone(),
            checkout_handle: appointment.checkout_handle.clone(),
            cancellation_reason: appointment.cancellation_reason.clone(),
            created: appointment.created.ok_or(ServiceError::InternalError)?,
            version: appointment.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AppointmentStatus::*;
    use super::*;

    const ALL: [AppointmentStatus; 5] = [PendingPayment, Confirmed, Cancelled, Completed, NoShow];

    #[test]
    fn test_allowed_transitions() {
        assert_eq!(PendingPayment.transition_to(Confirmed).unwrap(), Confirmed);
        assert_eq!(PendingPayment.transition_to(Cancelled).unwrap(), Cancelled);
        assert_eq!(Confirmed.transition_to(Cancelled).unwrap(), Cancelled);
        assert_eq!(Confirmed.transition_to(Completed).unwrap(), Completed);
        assert_eq!(Confirmed.transition_to(NoShow).unwrap(), NoShow);
    }

    #[test]
    fn test_terminal_states_have_no_way_out() {
        for from in [Cancelled, Completed, NoShow] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(
                    matches!(
                        from.transition_to(to),
                        Err(ServiceError::InvalidStatusTransition(f, t)) if f == from && t == to
                    ),
                    "{from} -> {to} must be rejected"
                );
            }
        }
    }

    #[test]
    fn test_rejected_transitions_of_active_states() {
        assert!(PendingPayment.transition_to(Completed).is_err());
        assert!(PendingPayment.transition_to(NoShow).is_err());
        assert!(PendingPayment.transition_to(PendingPayment).is_err());
        assert!(Confirmed.transition_to(PendingPayment).is_err());
        assert!(Confirmed.transition_to(Confirmed).is_err());
    }

    #[test]
    fn test_display_uses_wire_names() {
        assert_eq!(PendingPayment.to_string(), "PENDING_PAYMENT");
        assert_eq!(NoShow.to_string(), "NO_SHOW");
    }
}
