use async_trait::async_trait;
use service::{
    appointment::Appointment,
    notification::{NotificationEvent, NotificationService},
    ServiceError,
};
use tracing::info;

pub fn notification_text(event: NotificationEvent, appointment: &Appointment) -> String {
    let when = format!(
        "{} at {:02}:{:02}",
        appointment.start_time.date(),
        appointment.start_time.hour(),
        appointment.start_time.minute()
    );
    match event {
        NotificationEvent::Confirmed => format!("Your appointment on {when} is confirmed."),
        NotificationEvent::Modified => format!("Your appointment was moved to {when}."),
        NotificationEvent::Cancelled => match &appointment.cancellation_reason {
            Some(reason) => format!("Your appointment on {when} was cancelled: {reason}."),
            None => format!("Your appointment on {when} was cancelled."),
        },
    }
}

/// Writes notifications to the log instead of sending them.
pub struct LogNotificationServiceImpl;

#[async_trait]
impl NotificationService for LogNotificationServiceImpl {
    async fn dispatch(
        &self,
        event: NotificationEvent,
        appointment: &Appointment,
    ) -> Result<(), ServiceError> {
        info!(
            client_id = %appointment.client_id,
            appointment_id = %appointment.id,
            "{}",
            notification_text(event, appointment)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::appointment::{AppointmentStatus, PaymentMethod};
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn test_notification_text() {
        let appointment = Appointment {
            id: Uuid::nil(),
            business_id: Uuid::nil(),
            branch_id: Uuid::nil(),
            client_id: Uuid::nil(),
            offering_id: Uuid::nil(),
            professional_id: None,
            start_time: datetime!(2024-01-15 09:30),
            end_time: datetime!(2024-01-15 10:00),
            status: AppointmentStatus::Cancelled,
            payment_method: PaymentMethod::Local,
            price_cents: 0,
            notes: None,
            checkout_handle: None,
            cancellation_reason: Some("payment expired".into()),
            created: None,
            version: Uuid::nil(),
        };
        assert_eq!(
            notification_text(NotificationEvent::Confirmed, &appointment),
            "Your appointment on 2024-01-15 at 09:30 is confirmed."
        );
        assert_eq!(
            notification_text(NotificationEvent::Cancelled, &appointment),
            "Your appointment on 2024-01-15 at 09:30 was cancelled: payment expired."
        );
    }
}
