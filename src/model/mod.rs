//! Plain data types for the four stored resources, plus their create/update
//! payloads and query filters.
//!
//! The [`ActorEntity`](actor_framework::ActorEntity) implementations live next to
//! each actor (`category_actor::entity`, `product_actor::entity`, ...), keeping
//! this module free of behaviour.

pub mod category;
pub mod customer;
pub mod order;
pub mod product;

pub use category::*;
pub use customer::*;
pub use order::*;
pub use product::*;
