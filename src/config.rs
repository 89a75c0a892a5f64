//! Application settings, read from a TOML file.
//!
//! The file is located through the `ORDER_DESK_CONFIG` environment variable.
//! Without it every setting takes its default. Every section and key is
//! optional:
//!
//! ```toml
//! log_filter = "info"
//!
//! [actors]
//! buffer_size = 32
//!
//! [catalog]
//! # max_depth = 64   # unset means no cap
//!
//! [orders]
//! unresolved_products = "drop"   # or "reject"
//! dispatch = "inline"            # or "background"
//!
//! [notifications]
//! timeout_ms = 5000
//! email_recipient = { kind = "operations", address = "orders@example.com" }
//!
//! [notifications.sms]
//! enabled = true
//! username = "sandbox"
//! api_key = "..."
//!
//! [notifications.email]
//! enabled = true
//! smtp_host = "smtp.gmail.com"
//! smtp_port = 587
//! tls = "starttls"               # or "wrapper" for port 465
//!
//! [auth]
//! tokens = ["secret-token"]
//! ```

use crate::notify::{EmailRecipient, SmtpTls};
use crate::ordering::{DispatchMode, UnresolvedProductPolicy};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "ORDER_DESK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub actors: ActorConfig,
    pub catalog: CatalogConfig,
    pub orders: OrderConfig,
    pub notifications: NotificationConfig,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            actors: ActorConfig::default(),
            catalog: CatalogConfig::default(),
            orders: OrderConfig::default(),
            notifications: NotificationConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Mailbox capacity of every actor.
    pub buffer_size: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Deepest level below a root the tree resolver will walk. Unset means
    /// no cap; the resolver's visited set already stops loops.
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub unresolved_products: UnresolvedProductPolicy,
    pub dispatch: DispatchMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Per-channel delivery limit.
    pub timeout_ms: u64,
    pub email_recipient: EmailRecipient,
    pub sms: SmsConfig,
    pub email: EmailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            email_recipient: EmailRecipient::default(),
            sms: SmsConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// SMS gateway settings. Disabled channels are logged instead of sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub username: String,
    pub api_key: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.sandbox.africastalking.com/version1/messaging".to_string(),
            username: "sandbox".to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// `"starttls"` or `"wrapper"`. Unset picks from the port.
    pub tls: Option<SmtpTls>,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl EmailConfig {
    pub fn tls_mode(&self) -> SmtpTls {
        self.tls.unwrap_or_else(|| SmtpTls::for_port(self.smtp_port))
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            tls: None,
            username: String::new(),
            password: String::new(),
            from: "orders@example.com".to_string(),
        }
    }
}

/// Bearer tokens accepted for order placement. Empty means no check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<String>,
}

impl AppConfig {
    /// Reads the file named by `ORDER_DESK_CONFIG`, or returns the defaults
    /// when the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.actors.buffer_size == 0 {
            return Err(ConfigError::Invalid("actors.buffer_size must be at least 1".into()));
        }
        if self.catalog.max_depth == Some(0) {
            return Err(ConfigError::Invalid("catalog.max_depth must be at least 1".into()));
        }
        let notifications = &self.notifications;
        if notifications.timeout_ms == 0 {
            return Err(ConfigError::Invalid("notifications.timeout_ms must be positive".into()));
        }
        if let EmailRecipient::Operations { address } = &notifications.email_recipient {
            if address.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "notifications.email_recipient.address must not be empty".into(),
                ));
            }
        }
        if notifications.sms.enabled && notifications.sms.api_key.is_empty() {
            return Err(ConfigError::Invalid(
                "notifications.sms.api_key is required when SMS is enabled".into(),
            ));
        }
        if notifications.email.enabled && notifications.email.smtp_host.is_empty() {
            return Err(ConfigError::Invalid(
                "notifications.email.smtp_host is required when email is enabled".into(),
            ));
        }
        Ok(())
    }
}
