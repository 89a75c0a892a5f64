//! # Catalog Orders
//!
//! > **A small order desk built from resource-oriented actors.**
//!
//! The system keeps a category tree, products, customers and orders. It
//! answers two questions that cut across actors:
//!
//! - *What is the average price of everything under this category?*
//!   ([`catalog::PriceAggregator`])
//! - *Place this order and tell people about it.*
//!   ([`ordering::OrderWorkflow`])
//!
//! ## 🏗️ Architecture Notes
//!
//! ### 1. One actor per resource
//! Each resource is held by a generic `ResourceActor<T>` from the
//! `actor-framework` crate. Messages to one actor are handled strictly in
//! sequence, so a single `Create` is the transaction boundary: an order and
//! all its line items are stored together or not at all.
//!
//! ### 2. Typed errors at every layer
//! Each actor has its own `thiserror` enum (`CategoryError`, `ProductError`,
//! `CustomerError`, `OrderError`). Clients recover the entity's own error from
//! the framework error, and the [`api`] layer turns all of them into statuses.
//!
//! ### 3. Commit, then notify
//! Notifications are attempted only after the order actor has accepted the
//! order. A failed or slow channel never fails the request; it shows up in a
//! [`notify::NotificationReport`] and a `WARN` log line.
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Data ([`model`])
//! Plain structs and id newtypes. No behaviour.
//!
//! ### 2. Actors ([`category_actor`], [`product_actor`], [`customer_actor`], [`order_actor`])
//! `ActorEntity` implementations and error enums.
//! - The product actor runs with a [`CategoryClient`](clients::CategoryClient)
//!   as context and rejects products whose category does not exist.
//!
//! ### 3. The Interface ([`clients`])
//! Domain-specific wrappers around `ResourceClient`.
//!
//! ### 4. Services ([`catalog`], [`ordering`], [`notify`])
//! Cross-actor logic: subtree resolution, price aggregation, order
//! placement, notification delivery.
//!
//! ### 5. Edges ([`api`], [`auth`], [`config`], [`lifecycle`])
//! - [`lifecycle::OrderSystem`] starts and wires everything from an
//!   [`config::AppConfig`].
//! - [`api::Api`] maps JSON requests onto the services.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # With a config file
//! ORDER_DESK_CONFIG=order-desk.toml cargo run
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod category_actor;
pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod ordering;
pub mod product_actor;
