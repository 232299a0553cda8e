use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mailbox '{0}'")]
    Address(String),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub starttls: bool,
}

/// Delivers notifications through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        tracing::info!(
            host = %settings.host,
            port = settings.port,
            starttls = settings.starttls,
            "Initializing SMTP notifier"
        );

        let mut builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        }
        .port(settings.port);

        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|_| NotifyError::Address(address.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(mailbox(&notification.from)?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for to in &notification.to {
            builder = builder.to(mailbox(to)?);
        }
        let message = builder.body(notification.body.clone())?;

        self.transport.send(message).await?;
        tracing::debug!(subject = %notification.subject, "smtp: message accepted by relay");
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them.
/// Used when no SMTP host is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            from = %notification.from,
            to = ?notification.to,
            subject = %notification.subject,
            body = %notification.body,
            "Notification (log backend)"
        );
        Ok(())
    }
}

/// Send `notification` in the background. Delivery errors and timeouts are
/// logged and dropped; the caller never waits on the result.
/// Returns `None` (and logs) when called outside a Tokio runtime.
pub fn dispatch_detached(
    notifier: Arc<dyn Notifier>,
    notification: Notification,
    timeout: Duration,
) -> Option<JoinHandle<()>> {
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(
            subject = %notification.subject,
            "No async runtime, notification skipped"
        );
        return None;
    };

    Some(runtime.spawn(async move {
        match tokio::time::timeout(timeout, notifier.send(&notification)).await {
            Ok(Ok(())) => {
                tracing::debug!(subject = %notification.subject, "Notification delivered");
            }
            Ok(Err(e)) => {
                tracing::warn!(subject = %notification.subject, error = %e, "Notification failed");
            }
            Err(_) => {
                tracing::warn!(
                    subject = %notification.subject,
                    timeout_secs = timeout.as_secs(),
                    "Notification timed out"
                );
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl Notifier for Stalled {
        async fn send(&self, _: &Notification) -> Result<(), NotifyError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Notifier for Broken {
        async fn send(&self, n: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Address(n.from.clone()))
        }
    }

    fn sample() -> Notification {
        Notification {
            subject: "subject".into(),
            body: "body".into(),
            from: "form@acme.not".into(),
            to: vec!["admin@acme.not".into()],
        }
    }

    #[tokio::test]
    async fn test_dispatch_swallows_errors() {
        let handle = dispatch_detached(Arc::new(Broken), sample(), Duration::from_secs(1)).unwrap();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_is_bounded_by_timeout() {
        let handle =
            dispatch_detached(Arc::new(Stalled), sample(), Duration::from_millis(20)).unwrap();
        let finished = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[test]
    fn test_dispatch_outside_runtime_is_skipped() {
        assert!(dispatch_detached(Arc::new(Broken), sample(), Duration::from_secs(1)).is_none());
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_everything() {
        assert!(LogNotifier.send(&sample()).await.is_ok());
    }

    #[test]
    fn test_mailbox_parsing() {
        assert!(mailbox("admin@acme.not").is_ok());
        assert!(matches!(mailbox("not an address"), Err(NotifyError::Address(_))));
    }
}
