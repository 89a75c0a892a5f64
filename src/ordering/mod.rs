//! Order placement workflow and its policies.

mod policy;
mod workflow;

pub use policy::{DispatchMode, UnresolvedProductPolicy};
pub use workflow::{OrderStage, OrderWorkflow, PlacedOrder};
