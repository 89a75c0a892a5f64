use crate::category_actor::CategoryError;
use crate::model::CategoryId;
use crate::product_actor::ProductError;
use thiserror::Error;

/// Errors raised while walking the category tree or aggregating prices.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The root category of the query does not exist.
    #[error("Category not found: {0}")]
    NotFound(String),

    /// The subtree goes deeper than the configured limit.
    #[error("Category tree under {root} exceeds {max_depth} levels")]
    DepthExceeded { root: CategoryId, max_depth: usize },

    /// A category or product lookup failed.
    #[error("Catalog lookup failed: {0}")]
    Lookup(String),
}

impl From<CategoryError> for CatalogError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::NotFound(id) => CatalogError::NotFound(id),
            other => CatalogError::Lookup(other.to_string()),
        }
    }
}

impl From<ProductError> for CatalogError {
    fn from(e: ProductError) -> Self {
        CatalogError::Lookup(e.to_string())
    }
}
