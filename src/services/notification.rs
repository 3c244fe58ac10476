// src/services/notification.rs

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Messages the platform sends to people, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A resident registered and waits for approval.
    RegistrationReceived { email: String, barangay_id: i64 },
    AccountApproved { email: String, first_name: String },
    AccountRejected { email: String, first_name: String, reason: Option<String> },
    /// A requested certificate can be picked up.
    DocumentReady { email: String, control_number: String },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::RegistrationReceived { email, .. }
            | Notification::AccountApproved { email, .. }
            | Notification::AccountRejected { email, .. }
            | Notification::DocumentReady { email, .. } => email,
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Notification::RegistrationReceived { .. } => "Registration received",
            Notification::AccountApproved { .. } => "Your account has been approved",
            Notification::AccountRejected { .. } => "Your registration was not approved",
            Notification::DocumentReady { .. } => "Your document is ready for release",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Default sender: writes the message to the log instead of mailing it.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            recipient = notification.recipient(),
            subject = notification.subject(),
            "📧 Notification queued"
        );
        Ok(())
    }
}

/// Fire-and-forget. A failed send is logged and dropped; the request that
/// triggered it has already succeeded.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!(
                recipient = notification.recipient(),
                subject = notification.subject(),
                error = %e,
                "Notification could not be sent"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _notification: &Notification) -> anyhow::Result<()> {
            anyhow::bail!("smtp relay unreachable")
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let handle = dispatch(
            Arc::new(FailingNotifier),
            Notification::DocumentReady {
                email: "maria@example.com".into(),
                control_number: "BAR-2024-00001".into(),
            },
        );
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn dispatched_notifications_reach_the_sender() {
        let recorder = Arc::new(RecordingNotifier::default());
        let notification = Notification::AccountApproved {
            email: "juan@example.com".into(),
            first_name: "Juan".into(),
        };

        dispatch(recorder.clone(), notification.clone()).await.unwrap();

        assert_eq!(*recorder.sent.lock().unwrap(), vec![notification]);
    }

    #[test]
    fn recipient_is_the_email() {
        let n = Notification::RegistrationReceived {
            email: "new@example.com".into(),
            barangay_id: 3,
        };
        assert_eq!(n.recipient(), "new@example.com");
    }
}
