//! SMTP mail delivery.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use super::{Mailer, OutgoingMail};
use crate::config::MailConfig;
use crate::{NetlinkError, Result};

/// Mailer backed by an SMTP relay.
///
/// With no SMTP host configured it runs in no-op mode and only logs.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from configuration.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from = format!("{} <{}>", config.sender_name, config.sender_email)
            .parse::<Mailbox>()
            .map_err(|e| NetlinkError::Config(format!("invalid sender address: {e}")))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; mailer will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| NetlinkError::Config(format!("failed to configure SMTP transport: {e}")))?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    /// Check if SMTP transport is enabled.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let to = format!("{} <{}>", mail.to_name, mail.to_email)
            .parse::<Mailbox>()
            .or_else(|_| mail.to_email.parse::<Mailbox>())
            .map_err(|e| NetlinkError::Mail(format!("invalid recipient address: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(mail.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(mail.html_body.clone()),
                    ),
            )
            .map_err(|e| NetlinkError::Mail(format!("failed to build message: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(
                subject = %mail.subject,
                recipient = %mail.to_email,
                "Mailer running in no-op mode; skipping actual send"
            );
            return Ok(());
        };

        let message = self.build_message(&mail)?;
        transport
            .send(message)
            .await
            .map_err(|e| NetlinkError::Mail(format!("failed to send email: {e}")))?;
        info!(subject = %mail.subject, "Email sent");
        Ok(())
    }
}
