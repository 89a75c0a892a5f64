//! Order notifications over SMS and email.
//!
//! Channels are traits so the dispatcher can be driven by real transports
//! ([`HttpSmsSender`], [`SmtpEmailSender`]), by [`LogSender`], or by test fakes.

mod dispatcher;
mod email;
mod error;
mod log;
mod message;
mod sms;

pub use dispatcher::{ChannelOutcome, EmailRecipient, NotificationDispatcher, NotificationReport};
pub use email::{SmtpEmailSender, SmtpTls};
pub use error::NotificationError;
pub use log::LogSender;
pub use message::{order_email, order_sms_text, OutboundEmail, ORDER_EMAIL_SUBJECT};
pub use sms::HttpSmsSender;

use async_trait::async_trait;

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, email: &OutboundEmail) -> Result<(), NotificationError>;
}
