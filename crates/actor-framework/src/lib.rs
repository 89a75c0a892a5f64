//! # Actor Framework
//!
//! Building blocks for type-safe actor systems on tokio, organised around a
//! **Resource-Oriented** message set: every actor owns exactly one kind of
//! resource and answers the same small vocabulary of requests for it.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the resource's data, its payload types and its hooks.
//! 2. **Runtime** ([`ResourceActor`]): the task that owns the store and serves requests.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed, cloneable request senders.
//!
//! ## Request vocabulary
//!
//! | Request | Result | Notes |
//! |---------|--------|-------|
//! | `Create` | new ID | `from_create_params` then `on_create`; nothing stored on error |
//! | `Get` | `Option<T>` | |
//! | `GetMany` | `Vec<T>` | one entry per requested ID occurrence, unknown IDs skipped |
//! | `Find` | `Vec<T>` | entities for which [`ActorEntity::matches`] holds, in ID order |
//! | `Update` | `T` | hook runs on a copy; a failed update changes nothing |
//! | `Delete` | `()` | |
//! | `Action` | `T::ActionResult` | resource-specific escape hatch |
//!
//! ## Context injection
//!
//! Dependencies are handed to [`ResourceActor::run`], not to the constructor, so
//! actors can be created first and wired afterwards:
//!
//! ```rust,ignore
//! let (category_actor, category_client) = ResourceActor::<Category>::new(32);
//! let (product_actor, product_client) = ResourceActor::<Product>::new(32);
//!
//! tokio::spawn(category_actor.run(()));
//! // products validate their category on create
//! tokio::spawn(product_actor.run(category_client.clone()));
//! ```
//!
//! ## Concurrency model
//!
//! - Each actor runs in its own tokio task and exclusively owns its store.
//! - Messages to one actor are handled strictly one after another.
//! - Different actors run in parallel.
//! - An actor must never send a request to itself from inside a hook: its
//!   loop is busy with the current message, so the call would never return.
//!
//! ## Testing
//!
//! [`mock::MockClient`] serves scripted replies through a real `ResourceClient`,
//! which makes it possible to test coordinators and dependent actors without
//! spawning their dependencies.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
