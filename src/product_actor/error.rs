//! Error types for the Product actor.

use crate::model::CategoryId;
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Product name must not be empty")]
    EmptyName,

    /// Prices must be finite and non-negative.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// The product references a category that does not exist.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The category actor could not be consulted.
    #[error("Category lookup failed: {0}")]
    CategoryLookup(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
