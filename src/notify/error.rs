use thiserror::Error;

/// Why a single notification could not be delivered.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Could not build message: {0}")]
    Build(String),

    /// The gateway answered with a non-success status.
    #[error("Gateway rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    /// A sender could not be constructed from its settings.
    #[error("Invalid notifier configuration: {0}")]
    Config(String),
}
