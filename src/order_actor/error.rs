//! Error types for the Order actor and the order placement workflow.

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// A referenced resource does not exist. `entity` is `"customer"`,
    /// `"product"` or `"order"`.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The order could not be stored. Nothing was committed.
    #[error("Order persistence error: {0}")]
    PersistenceError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        OrderError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
