//! Log-only sender for development and for disabled channels.

use super::{EmailSender, NotificationError, OutboundEmail, SmsSender};
use async_trait::async_trait;
use tracing::info;

/// Writes notifications to the log instead of sending them. Always succeeds.
#[derive(Clone, Debug, Default)]
pub struct LogSender;

#[async_trait]
impl SmsSender for LogSender {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError> {
        info!(to = %to, message = %message, "SMS (log only)");
        Ok(())
    }
}

#[async_trait]
impl EmailSender for LogSender {
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        info!(to = %email.to, subject = %email.subject, body = %email.body, "Email (log only)");
        Ok(())
    }
}
