//! Best-effort fan-out of order notifications.
//!
//! Both channels run concurrently and each is bounded by the same timeout.
//! Nothing here returns an error: every outcome, good or bad, is recorded in
//! the [`NotificationReport`].

use super::message::{order_email, order_sms_text};
use super::{EmailSender, HttpSmsSender, LogSender, NotificationError, SmsSender, SmtpEmailSender};
use crate::config::NotificationConfig;
use crate::model::{Customer, Order};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Who receives the order email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EmailRecipient {
    /// A fixed operations mailbox.
    Operations { address: String },
    /// The customer who placed the order.
    Customer,
}

impl Default for EmailRecipient {
    fn default() -> Self {
        EmailRecipient::Operations {
            address: "orders@example.com".to_string(),
        }
    }
}

impl EmailRecipient {
    fn address_for<'a>(&'a self, customer: &'a Customer) -> Option<&'a str> {
        let address = match self {
            EmailRecipient::Operations { address } => address.as_str(),
            EmailRecipient::Customer => customer.email.as_str(),
        };
        let address = address.trim();
        (!address.is_empty()).then_some(address)
    }
}

/// What happened on one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    Delivered,
    Failed(String),
    TimedOut,
    /// Not attempted, e.g. the customer has no phone number.
    Skipped(String),
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ChannelOutcome::Delivered)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationReport {
    pub sms: ChannelOutcome,
    pub email: ChannelOutcome,
}

impl NotificationReport {
    pub fn all_delivered(&self) -> bool {
        self.sms.is_delivered() && self.email.is_delivered()
    }
}

pub struct NotificationDispatcher {
    sms: Arc<dyn SmsSender>,
    email: Arc<dyn EmailSender>,
    recipient: EmailRecipient,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        sms: Arc<dyn SmsSender>,
        email: Arc<dyn EmailSender>,
        recipient: EmailRecipient,
        timeout: Duration,
    ) -> Self {
        Self {
            sms,
            email,
            recipient,
            timeout,
        }
    }

    /// Both channels go to the log.
    pub fn logging(recipient: EmailRecipient, timeout: Duration) -> Self {
        Self::new(Arc::new(LogSender), Arc::new(LogSender), recipient, timeout)
    }

    /// Real transports for enabled channels, [`LogSender`] for disabled ones.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let timeout = config.timeout();

        let sms: Arc<dyn SmsSender> = if config.sms.enabled {
            Arc::new(HttpSmsSender::new(
                config.sms.endpoint.clone(),
                config.sms.username.clone(),
                config.sms.api_key.clone(),
                timeout,
            )?)
        } else {
            Arc::new(LogSender)
        };

        let email: Arc<dyn EmailSender> = if config.email.enabled {
            Arc::new(SmtpEmailSender::new(
                config.email.smtp_host.clone(),
                config.email.smtp_port,
                config.email.tls_mode(),
                &config.email.username,
                &config.email.password,
                &config.email.from,
                timeout,
            )?)
        } else {
            Arc::new(LogSender)
        };

        Ok(Self::new(sms, email, config.email_recipient.clone(), timeout))
    }

    pub async fn send_order_sms(&self, customer: &Customer, order: &Order) -> ChannelOutcome {
        if !customer.has_phone() {
            return ChannelOutcome::Skipped("customer has no phone number".to_string());
        }
        let text = order_sms_text(customer, order);
        bounded("sms", self.timeout, self.sms.send_sms(&customer.phone, &text)).await
    }

    pub async fn send_order_email(&self, customer: &Customer, order: &Order) -> ChannelOutcome {
        let Some(to) = self.recipient.address_for(customer) else {
            return ChannelOutcome::Skipped("no email recipient".to_string());
        };
        let email = order_email(customer, order, to);
        bounded("email", self.timeout, self.email.send_email(&email)).await
    }

    /// Attempts both channels concurrently.
    #[instrument(skip_all, fields(order_id = %order.id))]
    pub async fn dispatch(&self, order: &Order, customer: &Customer) -> NotificationReport {
        let (sms, email) = tokio::join!(
            self.send_order_sms(customer, order),
            self.send_order_email(customer, order)
        );
        debug!(?sms, ?email, "Notifications attempted");
        NotificationReport { sms, email }
    }
}

async fn bounded<F>(channel: &'static str, timeout: Duration, send: F) -> ChannelOutcome
where
    F: Future<Output = Result<(), NotificationError>>,
{
    match tokio::time::timeout(timeout, send).await {
        Ok(Ok(())) => ChannelOutcome::Delivered,
        Ok(Err(e)) => {
            warn!(channel, error = %e, "Notification failed");
            ChannelOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!(channel, timeout_ms = timeout.as_millis() as u64, "Notification timed out");
            ChannelOutcome::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, OrderId};
    use crate::notify::OutboundEmail;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SmsSender for Recording {
        async fn send_sms(&self, to: &str, _message: &str) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl EmailSender for Recording {
        async fn send_email(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push(email.to.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl SmsSender for Failing {
        async fn send_sms(&self, _to: &str, _message: &str) -> Result<(), NotificationError> {
            Err(NotificationError::Transport("connection refused".to_string()))
        }
    }

    struct Hanging;

    #[async_trait]
    impl EmailSender for Hanging {
        async fn send_email(&self, _email: &OutboundEmail) -> Result<(), NotificationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId(1),
            customer_id: CustomerId(1),
            products: Vec::new(),
            total: 0.0,
        }
    }

    fn customer(phone: &str) -> Customer {
        Customer::new(CustomerId(1), "Ada", "ada@example.com", phone)
    }

    #[tokio::test]
    async fn test_failure_and_timeout_are_reported_not_raised() {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(Failing),
            Arc::new(Hanging),
            EmailRecipient::default(),
            Duration::from_millis(50),
        );

        let report = dispatcher.dispatch(&order(), &customer("+254700000001")).await;

        assert!(matches!(report.sms, ChannelOutcome::Failed(_)));
        assert_eq!(report.email, ChannelOutcome::TimedOut);
        assert!(!report.all_delivered());
    }

    #[tokio::test]
    async fn test_no_phone_skips_sms() {
        let sms = Arc::new(Recording::default());
        let dispatcher = NotificationDispatcher::new(
            sms.clone(),
            Arc::new(LogSender),
            EmailRecipient::default(),
            Duration::from_secs(1),
        );

        let report = dispatcher.dispatch(&order(), &customer("  ")).await;

        assert!(matches!(report.sms, ChannelOutcome::Skipped(_)));
        assert_eq!(report.email, ChannelOutcome::Delivered);
        assert!(sms.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_recipient_policy() {
        let email = Arc::new(Recording::default());
        let to_customer = NotificationDispatcher::new(
            Arc::new(LogSender),
            email.clone(),
            EmailRecipient::Customer,
            Duration::from_secs(1),
        );
        let to_ops = NotificationDispatcher::new(
            Arc::new(LogSender),
            email.clone(),
            EmailRecipient::Operations {
                address: "ops@example.com".to_string(),
            },
            Duration::from_secs(1),
        );

        let report = to_customer.dispatch(&order(), &customer("")).await;
        assert!(report.email.is_delivered());
        to_ops.dispatch(&order(), &customer("")).await;

        assert_eq!(
            *email.sent.lock().unwrap(),
            vec!["ada@example.com".to_string(), "ops@example.com".to_string()]
        );
    }
}
