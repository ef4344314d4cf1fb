//! Asynchronous delivery of notification intents
//!
//! Request handlers hand intents to [`NotificationDispatcher::dispatch`] after the
//! operation that produced them has committed. A background worker drains the
//! queue; delivery failures are logged and never reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::{
    error::AppResult,
    models::NotificationIntent,
    repository::notifications::NotificationsRepository,
};

/// Destination of notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, intent: &NotificationIntent) -> AppResult<()>;
}

#[async_trait]
impl NotificationSink for NotificationsRepository {
    async fn deliver(&self, intent: &NotificationIntent) -> AppResult<()> {
        self.create(intent).await.map(|_| ())
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<NotificationIntent>,
}

impl NotificationDispatcher {
    /// Start the delivery worker with a queue of `capacity` pending intents
    pub fn spawn(sink: Arc<dyn NotificationSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(rx, sink));
        (Self { tx }, worker)
    }

    /// Queue intents without waiting; a full or closed queue drops them
    pub fn dispatch(&self, intents: Vec<NotificationIntent>) {
        for intent in intents {
            match self.tx.try_send(intent) {
                Ok(()) => {}
                Err(TrySendError::Full(intent)) => {
                    tracing::warn!(
                        user_id = %intent.user_id,
                        kind = %intent.kind,
                        "Notification queue full, dropping notification"
                    );
                }
                Err(TrySendError::Closed(intent)) => {
                    tracing::warn!(
                        user_id = %intent.user_id,
                        kind = %intent.kind,
                        "Notification worker stopped, dropping notification"
                    );
                }
            }
        }
    }
}

async fn run_worker(mut rx: mpsc::Receiver<NotificationIntent>, sink: Arc<dyn NotificationSink>) {
    while let Some(intent) = rx.recv().await {
        match sink.deliver(&intent).await {
            Ok(()) => tracing::info!(
                user_id = %intent.user_id,
                kind = %intent.kind,
                title = %intent.title,
                "Notification delivered"
            ),
            Err(e) => tracing::error!(
                user_id = %intent.user_id,
                kind = %intent.kind,
                "Failed to deliver notification: {}",
                e
            ),
        }
    }
    tracing::debug!("Notification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::NotificationKind;
    use uuid::Uuid;

    fn intent(kind: NotificationKind) -> NotificationIntent {
        NotificationIntent::for_booking(
            Uuid::new_v4(),
            kind,
            "Booking confirmed",
            "Your booking BK26010042 has been confirmed".to_string(),
            Uuid::new_v4(),
            "BK26010042",
        )
    }

    #[tokio::test]
    async fn test_worker_delivers_every_intent() {
        let mut sink = MockNotificationSink::new();
        sink.expect_deliver().times(2).returning(|_| Ok(()));

        let (dispatcher, worker) = NotificationDispatcher::spawn(Arc::new(sink), 8);
        dispatcher.dispatch(vec![
            intent(NotificationKind::BookingConfirmed),
            intent(NotificationKind::ReviewRequest),
        ]);
        drop(dispatcher);

        // The mock checks its expectations when the worker drops it
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_worker() {
        let mut sink = MockNotificationSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_deliver()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Internal("db down".into())));
        sink.expect_deliver()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|i| i.kind == NotificationKind::BookingCancelled)
            .returning(|_| Ok(()));

        let (dispatcher, worker) = NotificationDispatcher::spawn(Arc::new(sink), 8);
        dispatcher.dispatch(vec![
            intent(NotificationKind::BookingConfirmed),
            intent(NotificationKind::BookingCancelled),
        ]);
        drop(dispatcher);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let dispatcher = NotificationDispatcher { tx };

        dispatcher.dispatch(vec![
            intent(NotificationKind::BookingConfirmed),
            intent(NotificationKind::BookingCancelled),
            intent(NotificationKind::ReviewRequest),
        ]);
        drop(dispatcher);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, NotificationKind::BookingConfirmed);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_queue_is_not_an_error() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let dispatcher = NotificationDispatcher { tx };
        dispatcher.dispatch(vec![intent(NotificationKind::System)]);
    }
}
