use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use mockall::automock;

use crate::appointment::Appointment;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationEvent {
    Confirmed,
    Modified,
    Cancelled,
}

impl Display for NotificationEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationEvent::Confirmed => f.write_str("confirmed"),
            NotificationEvent::Modified => f.write_str("modified"),
            NotificationEvent::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Delivers appointment notifications to clients. Delivery errors never
/// affect the booking.
#[automock]
#[async_trait]
pub trait NotificationService {
    async fn dispatch(
        &self,
        event: NotificationEvent,
        appointment: &Appointment,
    ) -> Result<(), ServiceError>;
}
