//! SMTP email delivery using Lettre.
//!
//! Lettre's `SmtpTransport` is blocking, so each send runs on the blocking
//! pool. A fresh transport is built per message.
//!
//! The relay is secured either with STARTTLS (submission port 587) or with
//! TLS from the first byte (port 465); see [`SmtpTls`].

use super::{EmailSender, NotificationError, OutboundEmail};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plain connection upgraded with `STARTTLS`.
    StartTls,
    /// Implicit TLS.
    Wrapper,
}

impl SmtpTls {
    /// `Wrapper` on 465, `StartTls` everywhere else.
    pub fn for_port(port: u16) -> Self {
        if port == 465 {
            SmtpTls::Wrapper
        } else {
            SmtpTls::StartTls
        }
    }
}

#[derive(Clone)]
pub struct SmtpEmailSender {
    smtp_host: String,
    smtp_port: u16,
    tls: SmtpTls,
    credentials: Option<Credentials>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpEmailSender {
    /// Empty `username` means the relay is used without authentication.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if `from` is not a valid mailbox.
    pub fn new(
        smtp_host: impl Into<String>,
        smtp_port: u16,
        tls: SmtpTls,
        username: &str,
        password: &str,
        from: &str,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(format!("{from}: {e}")))?;
        let credentials = (!username.is_empty())
            .then(|| Credentials::new(username.to_string(), password.to_string()));

        Ok(Self {
            smtp_host: smtp_host.into(),
            smtp_port,
            tls,
            credentials,
            from,
            timeout,
        })
    }

    pub fn tls(&self) -> SmtpTls {
        self.tls
    }

    fn build_transport(&self) -> Result<SmtpTransport, NotificationError> {
        let builder = match self.tls {
            SmtpTls::StartTls => SmtpTransport::starttls_relay(&self.smtp_host),
            SmtpTls::Wrapper => SmtpTransport::relay(&self.smtp_host),
        };
        let mut builder = builder
            .map_err(|e| NotificationError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .timeout(Some(self.timeout));
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }
        Ok(builder.build())
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message, NotificationError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {e}", email.to)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| NotificationError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[instrument(skip(self, email), fields(to = %email.to, host = %self.smtp_host, tls = ?self.tls))]
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;
        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| NotificationError::Transport(format!("Email task failed: {e}")))?
            .map_err(|e| NotificationError::Transport(format!("Failed to send email: {e}")))?;

        debug!("Email handed to relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SmtpEmailSender {
        SmtpEmailSender::new(
            "smtp.example.com",
            587,
            SmtpTls::StartTls,
            "",
            "",
            "Orders <orders@example.com>",
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_tls_mode_follows_port() {
        assert_eq!(SmtpTls::for_port(587), SmtpTls::StartTls);
        assert_eq!(SmtpTls::for_port(25), SmtpTls::StartTls);
        assert_eq!(SmtpTls::for_port(465), SmtpTls::Wrapper);
    }

    #[test]
    fn test_transport_builds_in_both_modes() {
        assert!(sender().build_transport().is_ok());

        let wrapped = SmtpEmailSender::new(
            "smtp.example.com",
            465,
            SmtpTls::Wrapper,
            "user",
            "pass",
            "orders@example.com",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(wrapped.tls(), SmtpTls::Wrapper);
        assert!(wrapped.build_transport().is_ok());
    }

    #[test]
    fn test_invalid_from_rejected() {
        let result = SmtpEmailSender::new(
            "smtp.example.com",
            587,
            SmtpTls::StartTls,
            "",
            "",
            "not an address",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }

    #[test]
    fn test_invalid_recipient_fails_before_connecting() {
        let email = OutboundEmail {
            to: "nobody".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(
            sender().build_message(&email),
            Err(NotificationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_message_builds_for_valid_recipient() {
        let email = OutboundEmail {
            to: "ops@example.com".to_string(),
            subject: "New Order Placed".to_string(),
            body: "Total: 4.00".to_string(),
        };
        assert!(sender().build_message(&email).is_ok());
    }
}
