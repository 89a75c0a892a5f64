//! System startup, shutdown and observability.

pub mod order_system;
pub mod tracing;

pub use order_system::{OrderSystem, SystemError};
pub use self::tracing::setup_tracing;
