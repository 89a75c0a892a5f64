use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::category_actor::CategoryError;
use crate::customer_actor::CustomerError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use serde_json::json;
use thiserror::Error;

use super::ApiResponse;

/// A failed request, already classified by response status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Malformed body or invalid field values.
    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    NotFound(String),

    /// Storage or actor failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::ValidationError(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        ApiResponse {
            status: self.status(),
            body: json!({ "error": self.to_string() }),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::ValidationError(format!("Invalid request body: {e}"))
    }
}

impl From<CategoryError> for ApiError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::NotFound(_) | CategoryError::ParentNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CategoryError::EmptyName | CategoryError::SelfParent(_) => {
                ApiError::ValidationError(e.to_string())
            }
            CategoryError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(_) | ProductError::UnknownCategory(_) => {
                ApiError::NotFound(e.to_string())
            }
            ProductError::EmptyName | ProductError::InvalidPrice(_) => {
                ApiError::ValidationError(e.to_string())
            }
            ProductError::CategoryLookup(_) | ProductError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::NotFound(_) => ApiError::NotFound(e.to_string()),
            CustomerError::EmptyName => ApiError::ValidationError(e.to_string()),
            CustomerError::ActorCommunicationError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            OrderError::ValidationError(_) => ApiError::ValidationError(e.to_string()),
            OrderError::PersistenceError(_) | OrderError::ActorCommunicationError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => ApiError::NotFound(e.to_string()),
            CatalogError::DepthExceeded { .. } | CatalogError::Lookup(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
