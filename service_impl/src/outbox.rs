use std::sync::Arc;

use service::{
    notification::NotificationService,
    outbox::{OutboxMessage, OutboxService},
    ServiceError,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

/// Sending half of the outbox. Cloning it shares the channel.
#[derive(Clone)]
pub struct OutboxServiceImpl {
    sender: UnboundedSender<OutboxMessage>,
}

pub struct OutboxReceiver {
    receiver: UnboundedReceiver<OutboxMessage>,
}

pub fn outbox_channel() -> (OutboxServiceImpl, OutboxReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (OutboxServiceImpl { sender }, OutboxReceiver { receiver })
}

impl OutboxService for OutboxServiceImpl {
    fn publish(&self, message: OutboxMessage) -> Result<(), ServiceError> {
        self.sender.send(message).map_err(|_| {
            ServiceError::CollaboratorError("outbox", "dispatcher is not running".into())
        })
    }
}

impl OutboxReceiver {
    /// Delivers queued messages until every sender is dropped.
    pub async fn run<Notification>(mut self, notification_service: Arc<Notification>)
    where
        Notification: NotificationService + Send + Sync,
    {
        info!("Outbox dispatcher started");
        while let Some(message) = self.receiver.recv().await {
            if let Err(err) = notification_service
                .dispatch(message.event, &message.appointment)
                .await
            {
                error!(
                    "Failed to deliver {} notification of appointment {}: {}",
                    message.event, message.appointment.id, err
                );
            }
        }
        info!("Outbox dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::appointment::{Appointment, AppointmentStatus, PaymentMethod};
    use service::notification::{MockNotificationService, NotificationEvent};
    use time::macros::datetime;
    use uuid::uuid;

    fn appointment() -> Appointment {
        Appointment {
            id: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A001"),
            business_id: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A002"),
            branch_id: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A003"),
            client_id: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A004"),
            offering_id: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A005"),
            professional_id: None,
            start_time: datetime!(2024-01-15 10:00),
            end_time: datetime!(2024-01-15 10:30),
            status: AppointmentStatus::Confirmed,
            payment_method: PaymentMethod::Local,
            price_cents: 2500,
            notes: None,
            checkout_handle: None,
            cancellation_reason: None,
            created: Some(datetime!(2024-01-10 08:00)),
            version: uuid!("5C4F1D3A-8B1E-4E34-9D43-0C7B14F1A006"),
        }
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_and_survives_failures() {
        let (outbox, receiver) = outbox_channel();
        let mut notification_service = MockNotificationService::new();
        notification_service
            .expect_dispatch()
            .withf(|event, _| *event == NotificationEvent::Confirmed)
            .times(1)
            .returning(|_, _| Err(ServiceError::InternalError));
        notification_service
            .expect_dispatch()
            .withf(|event, _| *event == NotificationEvent::Cancelled)
            .times(1)
            .returning(|_, _| Ok(()));

        outbox
            .publish(OutboxMessage {
                event: NotificationEvent::Confirmed,
                appointment: appointment(),
            })
            .unwrap();
        outbox
            .publish(OutboxMessage {
                event: NotificationEvent::Cancelled,
                appointment: appointment(),
            })
            .unwrap();
        drop(outbox);

        receiver.run(Arc::new(notification_service)).await;
    }

    #[test]
    fn test_publish_without_dispatcher_fails() {
        let (outbox, receiver) = outbox_channel();
        drop(receiver);
        let result = outbox.publish(OutboxMessage {
            event: NotificationEvent::Modified,
            appointment: appointment(),
        });
        assert!(matches!(
            result,
            Err(ServiceError::CollaboratorError("outbox", _))
        ));
    }
}
