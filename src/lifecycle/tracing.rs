//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter that
//! hides module paths (`with_target(false)`); actors log their `entity_type`
//! instead. `RUST_LOG` wins over the configured default filter.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run   # full payloads at client entry points
//! ```
//!
//! ## Order placement trace
//!
//! With `RUST_LOG=info`:
//!
//! ```text
//! INFO place_order: Processing order stage=pending customer=customer_1 requested=3
//! INFO place_order: Order validated stage=validated items=3
//! INFO place_order:create_order: Sending create_order to actor
//! INFO Created entity_type="Order" id=order_1 size=1
//! INFO place_order: Order stored stage=persisted order_id=order_1 total=12.0
//! INFO place_order:dispatch: SMS (log only) to=+254700000001
//! INFO place_order: Order placed stage=notifications_attempted order_id=order_1
//! ```
//!
//! A failed or slow channel adds a `WARN Notification failed` or
//! `WARN Notification timed out` line carrying the `channel` field; the
//! order is still placed.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `default_filter` applies when `RUST_LOG`
/// is unset or unparsable.
pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
