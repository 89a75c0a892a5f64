//! Error types for the Category actor.

use crate::model::CategoryId;
use thiserror::Error;

/// Errors that can occur during category operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CategoryError {
    /// The requested category was not found.
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category name must not be empty")]
    EmptyName,

    /// The referenced parent does not exist.
    #[error("Parent category not found: {0}")]
    ParentNotFound(CategoryId),

    #[error("Category {0} cannot be its own parent")]
    SelfParent(CategoryId),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
