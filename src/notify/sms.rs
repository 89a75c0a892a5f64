//! SMS delivery through an HTTP messaging gateway.
//!
//! The gateway takes a form-encoded POST with `username`, `to` and `message`
//! fields and authenticates with an `apiKey` header.

use super::{NotificationError, SmsSender};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct HttpSmsSender {
    client: Client,
    endpoint: String,
    username: String,
    api_key: String,
}

impl HttpSmsSender {
    /// Build a sender whose HTTP client enforces `timeout` on every request.
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            username: username.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    #[instrument(skip(self, message), fields(endpoint = %self.endpoint))]
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apiKey", self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("username", self.username.as_str()),
                ("to", to),
                ("message", message),
            ])
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(%status, "SMS accepted by gateway");
        Ok(())
    }
}
