//! Outbound email for NetLink.
//!
//! Mail is best-effort: callers hand a message to [`spawn_send`], which
//! delivers it on a detached task and only logs failures.

mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;
pub use templates::ClientLinks;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::Result;

/// A fully rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Mail delivery backend.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, mail: OutgoingMail) -> Result<()>;
}

/// Deliver a message in the background.
///
/// The returned handle may be ignored; a failed send is logged at `warn`.
pub fn spawn_send(mailer: Arc<dyn Mailer>, mail: OutgoingMail) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let subject = mail.subject.clone();
        match mailer.send(mail).await {
            Ok(()) => debug!(subject = %subject, "Email dispatched"),
            Err(e) => warn!(subject = %subject, "Failed to send email: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetlinkError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<()> {
            self.sent.lock().unwrap().push(mail);
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _mail: OutgoingMail) -> Result<()> {
            Err(NetlinkError::Mail("relay unavailable".to_string()))
        }
    }

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to_email: "bob@example.com".to_string(),
            to_name: "Bob".to_string(),
            subject: "Hello".to_string(),
            html_body: "<p>Hi</p>".to_string(),
            text_body: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_spawn_send_delivers() {
        let mailer = Arc::new(RecordingMailer::default());

        spawn_send(mailer.clone(), mail()).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_spawn_send_failure_is_swallowed() {
        let handle = spawn_send(Arc::new(FailingMailer), mail());
        assert!(handle.await.is_ok());
    }
}
