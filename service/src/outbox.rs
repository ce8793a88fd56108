use mockall::automock;

use crate::appointment::Appointment;
use crate::notification::NotificationEvent;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboxMessage {
    pub event: NotificationEvent,
    pub appointment: Appointment,
}

/// Outbound channel for side effects of committed state transitions.
#[automock]
pub trait OutboxService {
    /// Queues the message without waiting for its delivery.
    fn publish(&self, message: OutboxMessage) -> Result<(), ServiceError>;
}
